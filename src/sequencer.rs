use std::time::Duration;

use tracing::info;

use crate::protocol::client::{LifxClientError, Lights};
use crate::protocol::messages::StateDelta;

/// Every command targets the whole light set; this program never addresses
/// individual bulbs.
pub const ALL_LIGHTS: &str = "all";

/// Number of warning pulses before the lights go out.
pub const WARN_PULSES: u32 = 2;
/// Transition time for each half of a warning pulse, and the wait that lets
/// the bulb finish it before the next command.
pub const WARN_STEP: Duration = Duration::from_secs(2);
/// Brightness dip of a warning pulse. The matching raise restores it, so a
/// full pulse is net-zero.
pub const WARN_BRIGHTNESS_DIP: f64 = 0.3;
/// Transition time for the final power-off fade.
pub const OFF_FADE: Duration = Duration::from_secs(10);

/// Runs the graduated warn-then-off protocol against a lighting service.
///
/// Invoked only on an away verdict. A failed call aborts the remaining
/// sequence immediately; the lights stay in whatever state the last
/// successful command produced.
pub struct ShutdownSequencer<'a, L: Lights> {
    lights: &'a L,
}

impl<'a, L: Lights> ShutdownSequencer<'a, L> {
    pub fn new(lights: &'a L) -> Self {
        ShutdownSequencer { lights }
    }

    pub async fn run(&self) -> Result<(), LifxClientError> {
        if !self.any_lights_on().await? {
            info!("Lights are already off. No need to turn them off again.");
            return Ok(());
        }
        for _ in 0..WARN_PULSES {
            self.warn_once().await?;
        }
        self.turn_off_slowly().await
    }

    async fn any_lights_on(&self) -> Result<bool, LifxClientError> {
        let lights = self.lights.list_lights(ALL_LIGHTS).await?;
        Ok(lights.iter().any(|light| light.is_on()))
    }

    /// One flicker: dim, wait for the transition, raise back, wait again.
    /// The waits are deliberate so each transition completes before the next
    /// command lands.
    async fn warn_once(&self) -> Result<(), LifxClientError> {
        let step = WARN_STEP.as_secs_f64();
        self.lights
            .state_delta(ALL_LIGHTS, &StateDelta::brightness(-WARN_BRIGHTNESS_DIP, step))
            .await?;
        tokio::time::sleep(WARN_STEP).await;
        self.lights
            .state_delta(ALL_LIGHTS, &StateDelta::brightness(WARN_BRIGHTNESS_DIP, step))
            .await?;
        tokio::time::sleep(WARN_STEP).await;
        info!("Warned once.");
        Ok(())
    }

    async fn turn_off_slowly(&self) -> Result<(), LifxClientError> {
        self.lights
            .state_delta(ALL_LIGHTS, &StateDelta::power_off(OFF_FADE.as_secs_f64()))
            .await?;
        tokio::time::sleep(OFF_FADE).await;
        info!("Turned off slowly.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::messages::{DeltaResponse, Light, Power};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeLights {
        lights: Vec<Light>,
        deltas: Mutex<Vec<StateDelta>>,
        fail_on_delta: Option<usize>,
    }

    impl FakeLights {
        fn with_powers(powers: &[Power]) -> Self {
            let lights = powers
                .iter()
                .enumerate()
                .map(|(i, power)| Light {
                    id: format!("d073d500000{i}"),
                    label: None,
                    power: *power,
                })
                .collect();
            FakeLights {
                lights,
                deltas: Mutex::new(Vec::new()),
                fail_on_delta: None,
            }
        }

        fn recorded_deltas(&self) -> Vec<StateDelta> {
            self.deltas.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Lights for FakeLights {
        async fn list_lights(&self, _selector: &str) -> Result<Vec<Light>, LifxClientError> {
            Ok(self.lights.clone())
        }

        async fn state_delta(
            &self,
            _selector: &str,
            delta: &StateDelta,
        ) -> Result<DeltaResponse, LifxClientError> {
            let mut deltas = self.deltas.lock().unwrap();
            if self.fail_on_delta == Some(deltas.len()) {
                return Err(LifxClientError::Api {
                    status: reqwest::StatusCode::TOO_MANY_REQUESTS,
                    body: "rate limited".to_string(),
                });
            }
            deltas.push(delta.clone());
            Ok(DeltaResponse { results: vec![] })
        }
    }

    #[tokio::test]
    async fn test_all_lights_off_short_circuits() {
        let fake = FakeLights::with_powers(&[Power::Off, Power::Off]);
        ShutdownSequencer::new(&fake).run().await.unwrap();
        assert!(fake.recorded_deltas().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_warns_twice_then_turns_off() {
        let fake = FakeLights::with_powers(&[Power::Off, Power::On]);
        let started = tokio::time::Instant::now();
        ShutdownSequencer::new(&fake).run().await.unwrap();

        let step = WARN_STEP.as_secs_f64();
        assert_eq!(
            fake.recorded_deltas(),
            vec![
                StateDelta::brightness(-WARN_BRIGHTNESS_DIP, step),
                StateDelta::brightness(WARN_BRIGHTNESS_DIP, step),
                StateDelta::brightness(-WARN_BRIGHTNESS_DIP, step),
                StateDelta::brightness(WARN_BRIGHTNESS_DIP, step),
                StateDelta::power_off(OFF_FADE.as_secs_f64()),
            ]
        );
        // 2s after each of the 4 pulse steps, then the 10s fade.
        assert_eq!(started.elapsed(), Duration::from_secs(18));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_call_aborts_remaining_sequence() {
        let mut fake = FakeLights::with_powers(&[Power::On]);
        fake.fail_on_delta = Some(2);
        let result = ShutdownSequencer::new(&fake).run().await;
        assert!(result.is_err());
        // First pulse completed, second pulse aborted on its opening dim.
        assert_eq!(fake.recorded_deltas().len(), 2);
    }
}
