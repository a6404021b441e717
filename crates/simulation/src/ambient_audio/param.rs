//! Automatable scalar parameters (gain, frequency, cutoff).
//!
//! A parameter is a time-ordered list of automation events evaluated at an
//! arbitrary graph time, in the style of a Web Audio `AudioParam`:
//! instantaneous sets, linear and exponential ramps that end at a time, and
//! exponential approaches toward a target with a time constant. Ramps start
//! from the value and time of the preceding event.

#[derive(Debug, Clone, Copy, PartialEq)]
enum Automation {
    SetValue {
        value: f32,
        time: f64,
    },
    LinearRamp {
        value: f32,
        end_time: f64,
    },
    ExponentialRamp {
        value: f32,
        end_time: f64,
    },
    SetTarget {
        target: f32,
        start_time: f64,
        time_constant: f64,
    },
}

impl Automation {
    /// Ordering key: when the event starts (sets, approaches) or ends (ramps).
    fn time(&self) -> f64 {
        match *self {
            Automation::SetValue { time, .. } => time,
            Automation::LinearRamp { end_time, .. } => end_time,
            Automation::ExponentialRamp { end_time, .. } => end_time,
            Automation::SetTarget { start_time, .. } => start_time,
        }
    }
}

/// Value of an exponential approach `elapsed` seconds after it started.
/// Moves monotonically from `from` toward `target` and never passes it.
pub fn approach(from: f32, target: f32, elapsed: f64, time_constant: f64) -> f32 {
    if time_constant <= 0.0 {
        return target;
    }
    let decay = (-elapsed.max(0.0) / time_constant).exp() as f32;
    target + (from - target) * decay
}

#[derive(Debug, Clone)]
pub struct AudioParam {
    /// Value before the first event, valid from `anchor_time` on.
    anchor_value: f32,
    anchor_time: f64,
    events: Vec<Automation>,
}

impl AudioParam {
    pub fn new(value: f32) -> Self {
        Self {
            anchor_value: value,
            anchor_time: 0.0,
            events: Vec::new(),
        }
    }

    pub fn set_value_at_time(&mut self, value: f32, time: f64) {
        self.insert(Automation::SetValue { value, time });
    }

    pub fn linear_ramp_to_value_at_time(&mut self, value: f32, end_time: f64) {
        self.insert(Automation::LinearRamp { value, end_time });
    }

    /// Exponential ramp. If the ramp would cross or touch zero the value holds
    /// until `end_time` and then jumps, since an exponential curve cannot
    /// reach zero.
    pub fn exponential_ramp_to_value_at_time(&mut self, value: f32, end_time: f64) {
        self.insert(Automation::ExponentialRamp { value, end_time });
    }

    pub fn set_target_at_time(&mut self, target: f32, start_time: f64, time_constant: f64) {
        self.insert(Automation::SetTarget {
            target,
            start_time,
            time_constant,
        });
    }

    /// Drop every event at or after `time` and pin the value it had then, so
    /// new automation starts from where the parameter actually is.
    pub fn cancel_and_hold_at_time(&mut self, time: f64) {
        let held = self.value_at(time);
        self.events.retain(|e| e.time() < time);
        self.insert(Automation::SetValue { value: held, time });
    }

    /// Number of pending automation events.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Evaluate the parameter at `time`.
    pub fn value_at(&self, time: f64) -> f32 {
        let mut value = self.anchor_value;
        let mut value_time = self.anchor_time;

        for (i, event) in self.events.iter().enumerate() {
            match *event {
                Automation::SetValue { value: v, time: at } => {
                    if at > time {
                        return value;
                    }
                    value = v;
                    value_time = at;
                }
                Automation::LinearRamp { value: v, end_time } => {
                    if end_time <= time {
                        value = v;
                        value_time = end_time;
                        continue;
                    }
                    let span = end_time - value_time;
                    if span <= 0.0 {
                        return v;
                    }
                    let frac = ((time - value_time) / span).clamp(0.0, 1.0) as f32;
                    return value + (v - value) * frac;
                }
                Automation::ExponentialRamp { value: v, end_time } => {
                    if end_time <= time {
                        value = v;
                        value_time = end_time;
                        continue;
                    }
                    if value * v <= 0.0 {
                        return value;
                    }
                    let span = end_time - value_time;
                    if span <= 0.0 {
                        return v;
                    }
                    let frac = ((time - value_time) / span).clamp(0.0, 1.0) as f32;
                    return value * (v / value).powf(frac);
                }
                Automation::SetTarget {
                    target,
                    start_time,
                    time_constant,
                } => {
                    if start_time > time {
                        return value;
                    }
                    // An approach runs until the next event takes over.
                    match self.events.get(i + 1).map(Automation::time) {
                        Some(next) if next <= time => {
                            value = approach(value, target, next - start_time, time_constant);
                            value_time = next;
                        }
                        _ => return approach(value, target, time - start_time, time_constant),
                    }
                }
            }
        }

        value
    }

    /// Fold events that are fully in the past into the anchor so long-lived
    /// parameters don't accumulate history.
    pub fn prune(&mut self, now: f64) {
        let mut settled = 0;
        for (i, event) in self.events.iter().enumerate() {
            let done = match event {
                Automation::SetTarget { .. } => self
                    .events
                    .get(i + 1)
                    .is_some_and(|next| next.time() <= now),
                other => other.time() <= now,
            };
            if !done {
                break;
            }
            settled = i + 1;
        }
        if settled == 0 {
            return;
        }

        let (value, time) = self.settle(settled);
        self.anchor_value = value;
        self.anchor_time = time;
        self.events.drain(..settled);
    }

    /// Value and time after the first `count` events have all completed.
    fn settle(&self, count: usize) -> (f32, f64) {
        let mut value = self.anchor_value;
        let mut value_time = self.anchor_time;
        for (i, event) in self.events[..count].iter().enumerate() {
            match *event {
                Automation::SetValue { value: v, time } => {
                    value = v;
                    value_time = time;
                }
                Automation::LinearRamp { value: v, end_time }
                | Automation::ExponentialRamp { value: v, end_time } => {
                    value = v;
                    value_time = end_time;
                }
                Automation::SetTarget {
                    target,
                    start_time,
                    time_constant,
                } => {
                    let next = self.events[i + 1].time();
                    value = approach(value, target, next - start_time, time_constant);
                    value_time = next;
                }
            }
        }
        (value, value_time)
    }

    fn insert(&mut self, event: Automation) {
        let at = event.time();
        let idx = self.events.partition_point(|e| e.time() <= at);
        self.events.insert(idx, event);
    }
}
