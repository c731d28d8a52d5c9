use glam::Vec3;
use winit::{
    event::{ElementState, KeyEvent},
    keyboard::{KeyCode, PhysicalKey},
};

/// Which model the number keys pick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Cube,
    Sphere,
    Cylinder,
    Cog,
    SmallCog,
    Terrain,
    Loaded,
    SmallCylinder,
    Camera,
    LightPoint,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    Select(Slot),
    /// Unit direction, scaled by the key speed of the selected model
    Move(Vec3),
    /// Axis to rotate around by the key speed (radians)
    Rotate(Vec3),
    /// Relative change of scale
    Zoom(f32),
    ChangeSpeed(f64),
    ToggleColourMode,
    CycleDrawMode,
    Help,
    PrintSelected,
    Quit,
}

impl Action {
    /// Actions that keep firing while their key is held
    pub fn repeats(&self) -> bool {
        matches!(
            self,
            Self::Select(_) | Self::Move(_) | Self::Rotate(_) | Self::Zoom(_) | Self::ChangeSpeed(_)
        )
    }
}

pub fn action_for(key: KeyCode) -> Option<Action> {
    use Action::*;
    let action = match key {
        KeyCode::Escape => Quit,

        KeyCode::Digit1 => Select(Slot::Cube),
        KeyCode::Digit2 => Select(Slot::Sphere),
        KeyCode::Digit3 => Select(Slot::Cylinder),
        KeyCode::Digit4 => Select(Slot::Cog),
        KeyCode::Digit5 => Select(Slot::SmallCog),
        KeyCode::Digit6 => Select(Slot::Terrain),
        KeyCode::Digit7 => Select(Slot::Loaded),
        KeyCode::Digit8 => Select(Slot::SmallCylinder),
        KeyCode::Digit9 => Select(Slot::Camera),
        KeyCode::Digit0 => Select(Slot::LightPoint),

        KeyCode::KeyQ => Move(Vec3::Z),
        KeyCode::KeyW => Move(Vec3::NEG_Y),
        KeyCode::KeyE => Move(Vec3::NEG_Z),
        KeyCode::KeyA => Move(Vec3::X),
        KeyCode::KeyS => Move(Vec3::Y),
        KeyCode::KeyD => Move(Vec3::NEG_X),

        KeyCode::KeyI => Rotate(Vec3::X),
        KeyCode::KeyK => Rotate(Vec3::NEG_X),
        KeyCode::KeyJ => Rotate(Vec3::Y),
        KeyCode::KeyL => Rotate(Vec3::NEG_Y),
        KeyCode::KeyU => Rotate(Vec3::Z),
        KeyCode::KeyO => Rotate(Vec3::NEG_Z),

        KeyCode::KeyZ => Zoom(-0.02),
        KeyCode::KeyX => Zoom(0.02),
        KeyCode::KeyC => ChangeSpeed(-1.0),
        KeyCode::KeyV => ChangeSpeed(1.0),

        KeyCode::KeyM => ToggleColourMode,
        KeyCode::KeyN => CycleDrawMode,
        KeyCode::KeyB => Help,
        KeyCode::Space => PrintSelected,
        _ => return None,
    };
    Some(action)
}

pub fn action_for_event(event: &KeyEvent) -> Option<Action> {
    let PhysicalKey::Code(code) = event.physical_key else {
        return None;
    };
    action_for_press(event.state, event.repeat, code)
}

/// Releases do nothing; a held key repeats only the continuous actions
pub fn action_for_press(state: ElementState, repeat: bool, key: KeyCode) -> Option<Action> {
    if state == ElementState::Released {
        return None;
    }
    action_for(key).filter(|action| !repeat || action.repeats())
}

pub const KEYBOARD_HELP: &str = "
                        Keyboard Instructions
                        ---------------------

Select a model with a number key; its name is shown in the window title.
The selected model then moves and rotates with the keys below.

    1 Cube       2 Sphere      3 Cylinder     4 Cog      5 Small Cog
    6 Terrain    7 Loaded obj  8 Small Cyl.   9 Camera   0 Light Point

    Move                          Rotate
    W / S   up / down             I / K   around x
    A / D   left / right          J / L   around y
    Q / E   back / front          U / O   around z

    Z / X   zoom out / in         C / V   animation slower / faster
    B       this help             N       cycle draw mode
    M       toggle colour mode    Space   print the selected model
    Esc     quit
";
