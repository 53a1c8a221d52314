use crate::galaxy::{apply_committed_parameters, RegenerateGalaxy};
use crate::prelude::*;
use bevy::color::ColorToPacked;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

pub struct ConfigEguiPlugin;

impl Plugin for ConfigEguiPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GalaxyParametersUi::default())
            .add_systems(Startup, configure_visuals_system)
            .add_systems(
                Update,
                (ui_system, commit_parameters_system)
                    .chain()
                    .before(apply_committed_parameters),
            );
    }
}

/// Draft edited by the panel widgets. Reaches [`GalaxyParameters`] only on commit.
#[derive(Resource, Default, Clone, Debug)]
pub struct GalaxyParametersUi {
    pub draft: GalaxyParameters,
    pub pointer_down: bool,
}

/// A draft is committed once the user lets go of the widget it was edited with.
pub fn should_commit(draft: &GalaxyParameters, applied: &GalaxyParameters, pointer_down: bool) -> bool {
    !pointer_down && draft != applied
}

fn configure_visuals_system(mut contexts: EguiContexts) {
    contexts.ctx_mut().set_visuals(egui::Visuals {
        window_corner_radius: 0.0.into(),
        ..Default::default()
    });
}

fn color_ui(ui: &mut egui::Ui, label: &str, color: &mut Color) {
    let mut rgb = color.to_srgba().to_u8_array_no_alpha();
    ui.horizontal(|ui| {
        if ui.color_edit_button_srgb(&mut rgb).changed() {
            *color = Color::srgb_u8(rgb[0], rgb[1], rgb[2]);
        }
        ui.label(label);
    });
}

fn parameters_widgets(params: &mut GalaxyParameters, ui: &mut egui::Ui) {
    let min = GalaxyParameters::MIN;
    let max = GalaxyParameters::MAX;
    let step = GalaxyParameters::STEP;

    ui.add(
        egui::Slider::new(&mut params.count, min.count..=max.count)
            .step_by(step.count as f64)
            .logarithmic(true)
            .text("count"),
    );
    ui.add(
        egui::Slider::new(&mut params.size, min.size..=max.size)
            .step_by(step.size as f64)
            .text("size"),
    );
    ui.add(
        egui::Slider::new(&mut params.radius, min.radius..=max.radius)
            .step_by(step.radius as f64)
            .text("radius"),
    );
    ui.add(
        egui::Slider::new(&mut params.branches, min.branches..=max.branches)
            .step_by(step.branches as f64)
            .text("branches"),
    );
    ui.add(
        egui::Slider::new(&mut params.spin, min.spin..=max.spin)
            .step_by(step.spin as f64)
            .text("spin"),
    );
    ui.add(
        egui::Slider::new(&mut params.randomness, min.randomness..=max.randomness)
            .step_by(step.randomness as f64)
            .text("randomness"),
    );
    ui.add(
        egui::Slider::new(
            &mut params.randomness_power,
            min.randomness_power..=max.randomness_power,
        )
        .step_by(step.randomness_power as f64)
        .text("randomness power"),
    );
    ui.separator();
    color_ui(ui, "inside color", &mut params.inside_color);
    color_ui(ui, "outside color", &mut params.outside_color);
}

fn ui_system(
    mut contexts: EguiContexts,
    mut parameters_ui: ResMut<GalaxyParametersUi>,
    particle_count: Res<ParticleCount>,
    mut regenerate: EventWriter<RegenerateGalaxy>,
) {
    let ctx = contexts.ctx_mut();
    parameters_ui.pointer_down = ctx.input(|i| i.pointer.any_down());

    egui::SidePanel::left("side_panel")
        .default_width(240.0)
        .show(ctx, |ui| {
            ui.heading("Galaxy");
            parameters_widgets(&mut parameters_ui.draft, ui);
            ui.separator();

            ui.label(format!("Particles: {}", particle_count.0));
            ui.horizontal(|ui| {
                if ui.button("Regenerate").clicked() {
                    regenerate.write(RegenerateGalaxy);
                }
                if ui.button("Reset").clicked() {
                    parameters_ui.draft = GalaxyParameters::default();
                }
            });
        });
}

fn commit_parameters_system(
    mut parameters_ui: ResMut<GalaxyParametersUi>,
    applied: Res<GalaxyParameters>,
    mut commits: EventWriter<ParametersCommitted>,
) {
    if should_commit(&parameters_ui.draft, &applied, parameters_ui.pointer_down) {
        let committed = parameters_ui.draft.sanitized();
        debug!("Committing galaxy parameters {:?}", committed);
        parameters_ui.draft = committed.clone();
        commits.write(ParametersCommitted(committed));
    }
}
