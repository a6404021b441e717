use simulation::time_of_day::TimeCategory;

const OPENING: &str = "Tiló! I am just resting here by the trees. ";

/// The persona's first line, picked for the time of day. Generated locally,
/// never sent to the model.
pub fn greeting_for(category: TimeCategory) -> String {
    let line = match category {
        TimeCategory::Morning => {
            "The birds are loud this morning. How did you sleep in the Stone Village?"
        }
        TimeCategory::Day => "How is your day going in the Stone Village?",
        TimeCategory::Evening => "The sun is going down. Are you resting now in the Stone Village?",
        TimeCategory::Night => {
            "The forest is dark and the moon is watching. Why are you awake in the Stone Village?"
        }
    };
    format!("{OPENING}{line}")
}
