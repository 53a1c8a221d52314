use bevy::{
    core_pipeline::tonemapping::Tonemapping,
    input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel},
    prelude::*,
    window::PrimaryWindow,
};
use bevy_egui::EguiContexts;
use std::f32::consts::{FRAC_PI_2, TAU};

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            .add_systems(PostUpdate, camera_control_system);
    }
}

const FOV_DEGREES: f32 = 75.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;

const MIN_DISTANCE: f32 = 0.1;
const MAX_DISTANCE: f32 = FAR;
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

fn spawn_camera(mut commands: Commands, mut clearcolor: ResMut<ClearColor>) {
    *clearcolor = ClearColor(Color::BLACK);

    let orbit = OrbitCamera::looking_from(Vec3::new(3.0, 3.0, 3.0), Vec3::ZERO);
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: FOV_DEGREES.to_radians(),
            near: NEAR,
            far: FAR,
            ..default()
        }),
        // keep the generated colors as picked
        Tonemapping::None,
        Transform::from_translation(orbit.translation()).looking_at(orbit.target, Vec3::Y),
        orbit,
    ));
}

/// Orbit controls around `target` with damped rotation, pan and zoom.
///
/// Input accumulates into per axis deltas. Every frame a `damping_factor`
/// share of each delta is applied and removed, so a flick keeps gliding
/// for a while and the total motion equals the input.
#[derive(Component, Clone, Debug)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub damping_factor: f32,
    yaw_delta: f32,
    pitch_delta: f32,
    pan_delta: Vec3,
    zoom_buffer: f32,
}

impl OrbitCamera {
    pub fn looking_from(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let distance = offset.length().clamp(MIN_DISTANCE, MAX_DISTANCE);
        Self {
            target,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            distance,
            damping_factor: 0.05,
            yaw_delta: 0.0,
            pitch_delta: 0.0,
            pan_delta: Vec3::ZERO,
            zoom_buffer: 0.0,
        }
    }

    pub fn translation(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target + self.distance * Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }

    /// `delta` is in fractions of the viewport height, a full height drag turns once around.
    pub fn rotate(&mut self, delta: Vec2) {
        self.yaw_delta -= delta.x * TAU;
        self.pitch_delta += delta.y * TAU;
    }

    /// Moves the target in the camera plane. `delta` is in fractions of the viewport height.
    pub fn pan(&mut self, delta: Vec2, right: Vec3, up: Vec3) {
        self.pan_delta += (-right * delta.x + up * delta.y) * self.distance;
    }

    /// Positive amounts move towards the target.
    pub fn zoom(&mut self, amount: f32) {
        self.zoom_buffer += amount;
    }

    pub fn is_settled(&self) -> bool {
        const EPSILON: f32 = 1e-5;
        self.yaw_delta.abs() < EPSILON
            && self.pitch_delta.abs() < EPSILON
            && self.pan_delta.length() < EPSILON
            && self.zoom_buffer.abs() < EPSILON
    }

    /// Advances the damped motion by one frame.
    pub fn step(&mut self) {
        let factor = self.damping_factor;

        self.yaw += self.yaw_delta * factor;
        self.pitch = (self.pitch + self.pitch_delta * factor).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.target += self.pan_delta * factor;

        let zoom_amount = self.zoom_buffer * factor;
        self.distance = (self.distance * (-zoom_amount).exp()).clamp(MIN_DISTANCE, MAX_DISTANCE);

        self.yaw_delta *= 1.0 - factor;
        self.pitch_delta *= 1.0 - factor;
        self.pan_delta *= 1.0 - factor;
        self.zoom_buffer -= zoom_amount;
    }
}

pub fn camera_control_system(
    mut query: Query<(&mut Transform, &mut OrbitCamera)>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut motion_evr: EventReader<MouseMotion>,
    mut scroll_evr: EventReader<MouseWheel>,
    mut contexts: EguiContexts,
) {
    let Ok((mut transform, mut orbit)) = query.single_mut() else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };

    let motion: Vec2 = motion_evr.read().map(|ev| ev.delta).sum();
    let scroll: f32 = scroll_evr
        .read()
        .map(|ev| match ev.unit {
            MouseScrollUnit::Line => ev.y * 0.1,
            MouseScrollUnit::Pixel => ev.y * 0.002,
        })
        .sum();

    // the panel owns the pointer while hovered
    let ctx = contexts.ctx_mut();
    let egui_has_pointer = ctx.wants_pointer_input() || ctx.is_pointer_over_area();

    if !egui_has_pointer {
        let height = window.height().max(1.0);
        let delta = motion / height;

        if mouse_buttons.pressed(MouseButton::Left) {
            orbit.rotate(delta);
        } else if mouse_buttons.any_pressed([MouseButton::Right, MouseButton::Middle]) {
            let right = *transform.right();
            let up = *transform.up();
            orbit.pan(delta, right, up);
        }
        orbit.zoom(scroll);
    }

    if orbit.is_settled() {
        return;
    }
    orbit.step();
    transform.translation = orbit.translation();
    transform.look_at(orbit.target, Vec3::Y);
}
