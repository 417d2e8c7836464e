use super::controller_state::Snapshot;
use crate::hardware::{FeedbackSink, Led};
use crate::info;
use std::time::Duration;
use strum_macros::Display;
use tokio::time::sleep;

/// Flight phase as derived from the last telemetry snapshot.
///
/// `Idle` covers the window before the first lander reply, where the
/// default state (not flying, not crashed) must not be mistaken for a
/// touchdown.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum LanderPhase {
    Idle,
    Flying,
    Crashed,
    Landed,
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Continue,
    Touchdown,
}

/// Drives the operator panel (LEDs, buzzer, display) from state snapshots
/// at the rendering cadence.
pub struct FeedbackStateMachine {
    panel: Box<dyn FeedbackSink + Send>,
}

impl FeedbackStateMachine {
    const LOW_FUEL_THRESHOLD: f32 = 50.0;
    const WARN_PULSE: Duration = Duration::from_millis(250);
    const TOUCHDOWN_TEXT: &'static str = "You have landed";

    pub fn new(panel: Box<dyn FeedbackSink + Send>) -> Self {
        Self { panel }
    }

    pub fn phase(snapshot: &Snapshot) -> LanderPhase {
        if snapshot.last_update.is_none() {
            LanderPhase::Idle
        } else if snapshot.flying {
            LanderPhase::Flying
        } else if snapshot.crashed {
            LanderPhase::Crashed
        } else {
            LanderPhase::Landed
        }
    }

    /// Renders one tick: flight text, phase indicators, the low-fuel pulse
    /// where it applies, and the touchdown exit.
    ///
    /// The low-fuel warning fires whenever telemetry has arrived, the
    /// lander is not crashed and fuel is at or below the threshold.
    pub async fn render(&mut self, snapshot: &Snapshot) -> RenderOutcome {
        #[allow(clippy::cast_possible_truncation)]
        self.panel.display(&format!(
            "Altitude: {} \nFuel: {} \nVelocity X: {}   Y: {}",
            snapshot.altitude as i32, snapshot.fuel as i32, snapshot.vel.0, snapshot.vel.1,
        ));

        let phase = Self::phase(snapshot);
        match phase {
            LanderPhase::Idle => {}
            LanderPhase::Flying => {
                self.panel.set_led(Led::Red, false);
                self.panel.set_led(Led::Blue, true);
            }
            LanderPhase::Crashed => {
                self.panel.set_led(Led::Blue, false);
                self.panel.set_led(Led::Red, true);
            }
            LanderPhase::Landed => {
                self.panel.set_led(Led::Red, false);
                self.panel.set_led(Led::Green, true);
            }
        }

        if phase != LanderPhase::Idle
            && phase != LanderPhase::Crashed
            && snapshot.fuel <= Self::LOW_FUEL_THRESHOLD
        {
            self.low_fuel_pulse().await;
        }

        if phase == LanderPhase::Landed {
            self.panel.display(Self::TOUCHDOWN_TEXT);
            info!("{}", Self::TOUCHDOWN_TEXT);
            return RenderOutcome::Touchdown;
        }
        RenderOutcome::Continue
    }

    async fn low_fuel_pulse(&mut self) {
        self.panel.set_buzzer(true);
        self.panel.set_led(Led::Warn, true);
        sleep(Self::WARN_PULSE).await;
        self.panel.set_buzzer(false);
        self.panel.set_led(Led::Warn, false);
    }
}
