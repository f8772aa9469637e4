use crate::pipeline::program::ShadingStage;
use crate::scene::light::{LightError, LightSet};
use crate::ui::input::{InputEvent, InputQueue};
use log::{info, warn};

/// Whether the render loop should keep going after handling input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Exit,
}

/// Flips light `index` and pushes the new flag to `stage`. Returns the new flag.
///
/// Nothing but the enabled flag changes, in the set or in the stage.
pub fn toggle_light<S: ShadingStage + ?Sized>(
    lights: &mut LightSet,
    stage: &mut S,
    index: usize,
) -> Result<bool, LightError> {
    let enabled = lights.toggle(index)?;
    stage.push_light_enabled(index, enabled);
    info!("Light {} enabled: {}", index + 1, enabled);
    Ok(enabled)
}

pub fn handle_event<S: ShadingStage + ?Sized>(
    event: InputEvent,
    lights: &mut LightSet,
    stage: &mut S,
) -> ControlFlow {
    match event {
        InputEvent::ToggleLight(index) => {
            if let Err(e) = toggle_light(lights, stage, index) {
                warn!("Ignoring toggle: {}", e);
            }
            ControlFlow::Continue
        }
        InputEvent::RequestClose => {
            info!("Close requested");
            ControlFlow::Exit
        }
    }
}

/// Drains `queue` in order. Events after a close request are discarded.
pub fn dispatch<S: ShadingStage + ?Sized>(
    queue: &mut InputQueue,
    lights: &mut LightSet,
    stage: &mut S,
) -> ControlFlow {
    for event in queue.drain() {
        if handle_event(event, lights, stage) == ControlFlow::Exit {
            return ControlFlow::Exit;
        }
    }
    ControlFlow::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::light::Light;

    #[derive(Default)]
    struct RecordingStage {
        pushed: Vec<(usize, bool)>,
    }

    impl ShadingStage for RecordingStage {
        fn push_light_enabled(&mut self, index: usize, enabled: bool) {
            self.pushed.push((index, enabled));
        }
    }

    #[test]
    fn toggle_flips_flag_and_pushes_it() {
        let mut lights = LightSet::demo();
        let mut stage = RecordingStage::default();

        assert_eq!(toggle_light(&mut lights, &mut stage, 1), Ok(false));
        assert_eq!(toggle_light(&mut lights, &mut stage, 1), Ok(true));
        assert_eq!(stage.pushed, vec![(1, false), (1, true)]);
    }

    #[test]
    fn toggle_leaves_other_fields_alone() {
        let mut lights = LightSet::demo();
        let before: Light = *lights.get(0).unwrap();
        toggle_light(&mut lights, &mut RecordingStage::default(), 0).unwrap();

        let after = lights.get(0).unwrap();
        assert!(!after.enabled);
        assert_eq!(after.position, before.position);
        assert_eq!(after.color, before.color);
        assert_eq!(after.attenuation, before.attenuation);
        assert!(lights.get(1).unwrap().enabled);
    }

    #[test]
    fn out_of_range_toggle_pushes_nothing() {
        let mut lights = LightSet::demo();
        let mut stage = RecordingStage::default();
        assert_eq!(
            toggle_light(&mut lights, &mut stage, 3),
            Err(LightError::NoSuchLight { index: 3, count: 3 })
        );
        assert_eq!(
            handle_event(InputEvent::ToggleLight(7), &mut lights, &mut stage),
            ControlFlow::Continue
        );
        assert!(stage.pushed.is_empty());
        assert_eq!(lights, LightSet::demo());
    }

    #[test]
    fn dispatch_stops_at_close_request() {
        let mut queue = InputQueue::new();
        queue.push(InputEvent::ToggleLight(0));
        queue.push(InputEvent::ToggleLight(2));
        queue.push(InputEvent::RequestClose);
        queue.push(InputEvent::ToggleLight(1));

        let mut lights = LightSet::demo();
        let mut stage = RecordingStage::default();
        assert_eq!(dispatch(&mut queue, &mut lights, &mut stage), ControlFlow::Exit);
        assert_eq!(stage.pushed, vec![(0, false), (2, false)]);
        assert!(lights.get(1).unwrap().enabled);
        assert!(queue.is_empty());
    }

    #[test]
    fn dispatch_reaches_shader_program_slots() {
        use crate::pipeline::program::ShaderProgram;

        let mut lights = LightSet::demo();
        let mut program = ShaderProgram::link();
        program.upload_lights(&lights);

        let mut queue = InputQueue::new();
        queue.push(InputEvent::ToggleLight(1));
        assert_eq!(dispatch(&mut queue, &mut lights, &mut program), ControlFlow::Continue);
        assert!(!program.read_light(1).unwrap().enabled);
        assert!(program.read_light(0).unwrap().enabled);
    }
}
