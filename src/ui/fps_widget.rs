use crate::prelude::*;
use bevy::diagnostic::DiagnosticsStore;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;

pub struct FpsWidgetPlugin;

impl Plugin for FpsWidgetPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_widget)
            .add_systems(Update, update_widget_system)
            .add_plugins(FrameTimeDiagnosticsPlugin::default());
    }
}

#[derive(Component)]
struct FpsText;

#[derive(Component)]
struct ParticleText;

fn setup_widget(mut commands: Commands) {
    let font = TextFont {
        font_size: 16.0,
        ..default()
    };

    commands
        .spawn((
            Node {
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::FlexStart,
                position_type: PositionType::Absolute,
                justify_content: JustifyContent::FlexStart,
                width: Val::Px(240.),
                right: Val::Percent(1.),
                top: Val::Percent(1.),
                bottom: Val::Auto,
                left: Val::Auto,
                padding: UiRect::all(Val::Px(8.0)),
                ..default()
            },
            BackgroundColor(Color::linear_rgba(0.0, 0.03, 0.08, 0.5)),
            GlobalZIndex(i32::MAX - 1),
        ))
        .with_children(|parent| {
            parent.spawn((FpsText, Text(" N/A".to_string()), font.clone()));
            parent.spawn((ParticleText, Text(" N/A".to_string()), font));
        });
}

fn stats_line(label: &str, value: &str) -> String {
    format!("{:>11} {:<12}", label, value)
}

fn update_widget_system(
    diagnostics: Res<DiagnosticsStore>,
    particle_count: Res<ParticleCount>,
    mut fps_query: Query<&mut Text, (With<FpsText>, Without<ParticleText>)>,
    mut particle_query: Query<&mut Text, (With<ParticleText>, Without<FpsText>)>,
) {
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
        .unwrap_or(0.0);
    let frame_time = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FRAME_TIME)
        .and_then(|fps| fps.smoothed())
        .unwrap_or(0.0);

    for mut text in &mut fps_query {
        text.0 = stats_line("FPS:", &format!("{fps:.1} ({frame_time:.2} ms)"));
    }
    if particle_count.is_changed() {
        for mut text in &mut particle_query {
            text.0 = stats_line("Particles:", &particle_count.0.to_string());
        }
    }
}
