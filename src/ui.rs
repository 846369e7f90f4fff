//! Ball control panel: command buttons, bounce readout, parameter steppers.
//!
//! ## Layer Model
//!
//! | Element            | Widget            | Behaviour                        |
//! |--------------------|-------------------|----------------------------------|
//! | Drop Ball / Hit    | `Button`          | Emit a controller command        |
//! | Bounce counter     | `Text`            | Refreshed from change messages   |
//! | Parameter rows     | `Button` − / +    | Step + clamp a [`TuningValues`]  |
//!
//! Body-parameter edits (friction/damping) do not touch the live ball; they
//! arm a single-slot respawn timer so a burst of presses rebuilds the ball
//! once, with the final values.  Drop height / radius / hit force only take
//! effect on the next explicit command.

use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::prelude::*;

use crate::ball::{ActiveBall, BounceCountChanged, DropBall, HitBall, PhysicsParams};
use crate::config::PhysicsConfig;
use crate::constants::*;

// ── Tuning values ─────────────────────────────────────────────────────────────

/// Current panel values, real-world units.  The single source the Drop and
/// Hit commands (and debounced respawns) snapshot from.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct TuningValues {
    pub drop_height: f32,
    pub ball_radius: f32,
    pub hit_force: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub static_friction: f32,
    pub dynamic_friction: f32,
}

impl Default for TuningValues {
    fn default() -> Self {
        Self {
            drop_height: DROP_HEIGHT_DEFAULT,
            ball_radius: BALL_RADIUS_DEFAULT,
            hit_force: HIT_FORCE_DEFAULT,
            linear_damping: LINEAR_DAMPING_DEFAULT,
            angular_damping: ANGULAR_DAMPING_DEFAULT,
            static_friction: STATIC_FRICTION_DEFAULT,
            dynamic_friction: DYNAMIC_FRICTION_DEFAULT,
        }
    }
}

impl TuningValues {
    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self {
            drop_height: config.drop_height,
            ball_radius: config.ball_radius,
            hit_force: config.hit_force,
            linear_damping: config.linear_damping,
            angular_damping: config.angular_damping,
            static_friction: config.static_friction,
            dynamic_friction: config.dynamic_friction,
        }
    }

    /// Snapshot handed to the controller at drop time.
    pub fn physics_params(&self) -> PhysicsParams {
        PhysicsParams {
            static_friction: self.static_friction,
            dynamic_friction: self.dynamic_friction,
            linear_damping: self.linear_damping,
            angular_damping: self.angular_damping,
        }
    }

    /// Balls drop straight down over the ground-plane centre.
    pub fn drop_position(&self) -> Vec3 {
        Vec3::new(0.0, self.drop_height, 0.0)
    }

    fn drop_command(&self) -> DropBall {
        DropBall {
            position: self.drop_position(),
            radius: self.ball_radius,
            params: self.physics_params(),
        }
    }
}

// ── Field table ───────────────────────────────────────────────────────────────

/// Tags a stepper row with the tuning field it controls.
#[derive(Component, Clone, Copy, PartialEq, Eq, Debug)]
pub enum TuningField {
    DropHeight,
    BallRadius,
    HitForce,
    LinearDamping,
    AngularDamping,
    StaticFriction,
    DynamicFriction,
}

impl TuningField {
    pub const ALL: [TuningField; 7] = [
        TuningField::DropHeight,
        TuningField::BallRadius,
        TuningField::HitForce,
        TuningField::LinearDamping,
        TuningField::AngularDamping,
        TuningField::StaticFriction,
        TuningField::DynamicFriction,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TuningField::DropHeight => "Drop Height",
            TuningField::BallRadius => "Ball Radius",
            TuningField::HitForce => "Hit Force",
            TuningField::LinearDamping => "Linear Damping",
            TuningField::AngularDamping => "Angular Damping",
            TuningField::StaticFriction => "Static Friction",
            TuningField::DynamicFriction => "Dynamic Friction",
        }
    }

    pub fn range(self) -> (f32, f32) {
        match self {
            TuningField::DropHeight => (DROP_HEIGHT_MIN, DROP_HEIGHT_MAX),
            TuningField::BallRadius => (BALL_RADIUS_MIN, BALL_RADIUS_MAX),
            TuningField::HitForce => (HIT_FORCE_MIN, HIT_FORCE_MAX),
            _ => (FRACTION_MIN, FRACTION_MAX),
        }
    }

    pub fn step(self) -> f32 {
        match self {
            TuningField::DropHeight => DROP_HEIGHT_STEP,
            TuningField::BallRadius => BALL_RADIUS_STEP,
            TuningField::HitForce => HIT_FORCE_STEP,
            _ => FRACTION_STEP,
        }
    }

    /// Whether a change to this field rebuilds the ball (via the debounced
    /// respawn).  Drop height / radius / force only matter at command time.
    pub fn rebuilds_ball(self) -> bool {
        matches!(
            self,
            TuningField::LinearDamping
                | TuningField::AngularDamping
                | TuningField::StaticFriction
                | TuningField::DynamicFriction
        )
    }

    pub fn get(self, tuning: &TuningValues) -> f32 {
        match self {
            TuningField::DropHeight => tuning.drop_height,
            TuningField::BallRadius => tuning.ball_radius,
            TuningField::HitForce => tuning.hit_force,
            TuningField::LinearDamping => tuning.linear_damping,
            TuningField::AngularDamping => tuning.angular_damping,
            TuningField::StaticFriction => tuning.static_friction,
            TuningField::DynamicFriction => tuning.dynamic_friction,
        }
    }

    pub fn set(self, tuning: &mut TuningValues, value: f32) {
        match self {
            TuningField::DropHeight => tuning.drop_height = value,
            TuningField::BallRadius => tuning.ball_radius = value,
            TuningField::HitForce => tuning.hit_force = value,
            TuningField::LinearDamping => tuning.linear_damping = value,
            TuningField::AngularDamping => tuning.angular_damping = value,
            TuningField::StaticFriction => tuning.static_friction = value,
            TuningField::DynamicFriction => tuning.dynamic_friction = value,
        }
    }

    /// Row text, e.g. `Drop Height: 0.50 m` / `Hit Force: 50.0 N`.
    pub fn format_row(self, value: f32) -> String {
        match self {
            TuningField::DropHeight | TuningField::BallRadius => {
                format!("{}: {:.2} m", self.label(), value)
            }
            TuningField::HitForce => format!("{}: {:.1} N", self.label(), value),
            _ => format!("{}: {:.2}", self.label(), value),
        }
    }
}

// ── Marker components ─────────────────────────────────────────────────────────

/// Marker for the panel root node.
#[derive(Component)]
pub struct ControlPanel;

/// Marker for the bounce counter number text.
#[derive(Component)]
pub struct BounceCounterText;

/// Marker for a row's value text.
#[derive(Component)]
pub struct FieldLabel(pub TuningField);

/// The two panel commands.
#[derive(Component, Clone, Copy, PartialEq, Eq, Debug)]
pub enum PanelCommand {
    Drop,
    Hit,
}

/// Step direction of a − / + button.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StepDir {
    Down,
    Up,
}

impl StepDir {
    fn sign(self) -> f32 {
        match self {
            StepDir::Down => -1.0,
            StepDir::Up => 1.0,
        }
    }
}

/// Tags a stepper button with its field and direction.
#[derive(Component, Clone, Copy, Debug)]
pub struct AdjustButton {
    pub field: TuningField,
    pub dir: StepDir,
}

// ── Respawn debounce ──────────────────────────────────────────────────────────

/// Single-slot deferred respawn.
///
/// Arming replaces any pending timer, so only the most recent parameter
/// change survives; superseded ones have no effect.
#[derive(Resource, Debug, Default)]
pub struct RespawnDebounce(pub Option<Timer>);

impl RespawnDebounce {
    pub fn arm(&mut self) {
        self.0 = Some(Timer::from_seconds(
            PARAM_RESPAWN_DEBOUNCE_SECS,
            TimerMode::Once,
        ));
    }
}

// ── Colors ────────────────────────────────────────────────────────────────────

fn panel_bg() -> Color {
    Color::srgba(0.05, 0.05, 0.08, 0.93)
}
fn panel_border() -> Color {
    Color::srgb(0.32, 0.32, 0.44)
}
fn title_color() -> Color {
    Color::srgb(0.95, 0.88, 0.45)
}
fn separator_color() -> Color {
    Color::srgb(0.28, 0.28, 0.38)
}
fn row_text_color() -> Color {
    Color::srgb(0.85, 0.85, 0.88)
}
fn stepper_bg() -> Color {
    Color::srgb(0.12, 0.12, 0.18)
}
fn stepper_text() -> Color {
    Color::srgb(0.65, 0.80, 1.0)
}
fn drop_bg() -> Color {
    Color::srgb(0.08, 0.36, 0.14)
}
fn drop_border() -> Color {
    Color::srgb(0.18, 0.72, 0.28)
}
fn drop_text() -> Color {
    Color::srgb(0.75, 1.0, 0.80)
}
fn hit_bg() -> Color {
    Color::srgb(0.10, 0.18, 0.36)
}
fn hit_border() -> Color {
    Color::srgb(0.22, 0.44, 0.78)
}
fn hit_text() -> Color {
    Color::srgb(0.65, 0.80, 1.0)
}
fn hit_disabled_bg() -> Color {
    Color::srgb(0.10, 0.10, 0.14)
}
fn counter_color() -> Color {
    Color::srgb(0.80, 0.95, 1.0)
}

// ── Setup ─────────────────────────────────────────────────────────────────────

/// Startup system: seed [`TuningValues`] from the loaded config and spawn the
/// panel.  Must run after `load_physics_config`.
pub fn setup_control_panel(mut commands: Commands, config: Res<PhysicsConfig>) {
    let tuning = TuningValues::from_config(&config);

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(12.0),
                top: Val::Px(10.0),
                width: Val::Px(PANEL_WIDTH_PX),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(12.0)),
                row_gap: Val::Px(7.0),
                border: UiRect::all(Val::Px(1.0)),
                ..default()
            },
            BackgroundColor(panel_bg()),
            BorderColor::all(panel_border()),
            ControlPanel,
        ))
        .with_children(|panel| {
            panel.spawn((
                Text::new("Ball Controls"),
                TextFont {
                    font_size: PANEL_TITLE_FONT_SIZE,
                    ..default()
                },
                TextColor(title_color()),
            ));

            spawn_separator(panel);

            // Command buttons
            panel
                .spawn(Node {
                    flex_direction: FlexDirection::Row,
                    column_gap: Val::Px(10.0),
                    justify_content: JustifyContent::Center,
                    ..default()
                })
                .with_children(|row| {
                    spawn_command_button(
                        row,
                        PanelCommand::Drop,
                        "Drop Ball",
                        drop_bg(),
                        drop_border(),
                        drop_text(),
                    );
                    // Disabled look until the first drop; the slot starts empty.
                    spawn_command_button(
                        row,
                        PanelCommand::Hit,
                        "Hit Ball",
                        hit_disabled_bg(),
                        hit_border(),
                        hit_text(),
                    );
                });

            // Bounce counter
            panel
                .spawn(Node {
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Center,
                    row_gap: Val::Px(2.0),
                    ..default()
                })
                .with_children(|counter| {
                    counter.spawn((
                        Text::new("Bounce Count"),
                        TextFont {
                            font_size: PANEL_ROW_FONT_SIZE,
                            ..default()
                        },
                        TextColor(separator_color()),
                    ));
                    counter.spawn((
                        Text::new("0"),
                        TextFont {
                            font_size: BOUNCE_COUNT_FONT_SIZE,
                            ..default()
                        },
                        TextColor(counter_color()),
                        BounceCounterText,
                    ));
                });

            spawn_separator(panel);

            for field in TuningField::ALL {
                spawn_field_row(panel, field, field.get(&tuning));
            }
        });

    commands.insert_resource(tuning);
}

fn spawn_separator(parent: &mut ChildSpawnerCommands<'_>) {
    parent.spawn((
        Text::new("──────────────────────────────"),
        TextFont {
            font_size: 9.0,
            ..default()
        },
        TextColor(separator_color()),
    ));
}

fn spawn_command_button(
    parent: &mut ChildSpawnerCommands<'_>,
    command: PanelCommand,
    label: &str,
    bg: Color,
    border: Color,
    text: Color,
) {
    parent
        .spawn((
            Button,
            Node {
                padding: UiRect::axes(Val::Px(12.0), Val::Px(6.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border: UiRect::all(Val::Px(1.0)),
                ..default()
            },
            BackgroundColor(bg),
            BorderColor::all(border),
            command,
        ))
        .with_children(|btn| {
            btn.spawn((
                Text::new(label),
                TextFont {
                    font_size: PANEL_ROW_FONT_SIZE,
                    ..default()
                },
                TextColor(text),
            ));
        });
}

fn spawn_field_row(parent: &mut ChildSpawnerCommands<'_>, field: TuningField, initial: f32) {
    parent
        .spawn(Node {
            flex_direction: FlexDirection::Row,
            column_gap: Val::Px(7.0),
            align_items: AlignItems::Center,
            ..default()
        })
        .with_children(|row| {
            for (dir, glyph) in [(StepDir::Down, "−"), (StepDir::Up, "+")] {
                row.spawn((
                    Button,
                    Node {
                        width: Val::Px(22.0),
                        height: Val::Px(19.0),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        border: UiRect::all(Val::Px(1.0)),
                        ..default()
                    },
                    BackgroundColor(stepper_bg()),
                    BorderColor::all(panel_border()),
                    AdjustButton { field, dir },
                ))
                .with_children(|btn| {
                    btn.spawn((
                        Text::new(glyph),
                        TextFont {
                            font_size: PANEL_ROW_FONT_SIZE,
                            ..default()
                        },
                        TextColor(stepper_text()),
                    ));
                });
            }

            row.spawn((
                Text::new(field.format_row(initial)),
                TextFont {
                    font_size: PANEL_ROW_FONT_SIZE,
                    ..default()
                },
                TextColor(row_text_color()),
                FieldLabel(field),
            ));
        });
}

// ── Update systems ────────────────────────────────────────────────────────────

/// Process − / + presses: step the field, clamp to its range, and arm the
/// respawn debounce for body parameters.
pub fn panel_adjust_button_system(
    mut tuning: ResMut<TuningValues>,
    mut debounce: ResMut<RespawnDebounce>,
    query: Query<(&Interaction, &AdjustButton), (Changed<Interaction>, With<Button>)>,
) {
    for (interaction, adjust) in query.iter() {
        if *interaction != Interaction::Pressed {
            continue;
        }
        let (min, max) = adjust.field.range();
        let stepped = adjust.field.get(&tuning) + adjust.field.step() * adjust.dir.sign();
        adjust.field.set(&mut tuning, stepped.clamp(min, max));

        if adjust.field.rebuilds_ball() {
            debounce.arm();
        }
    }
}

/// Refresh every row label when any tuning value changes.
pub fn tuning_label_refresh_system(
    tuning: Res<TuningValues>,
    mut query: Query<(&FieldLabel, &mut Text)>,
) {
    if !tuning.is_changed() {
        return;
    }
    for (label, mut text) in query.iter_mut() {
        *text = Text::new(label.0.format_row(label.0.get(&tuning)));
    }
}

/// Tick the armed respawn timer; on expiry, rebuild the ball with the current
/// values.  A superseded timer never reaches this point — arming replaced it.
pub fn respawn_debounce_system(
    time: Res<Time>,
    mut debounce: ResMut<RespawnDebounce>,
    tuning: Res<TuningValues>,
    mut drops: MessageWriter<DropBall>,
) {
    let Some(timer) = debounce.0.as_mut() else {
        return;
    };
    if timer.tick(time.delta()).just_finished() {
        debounce.0 = None;
        drops.write(tuning.drop_command());
    }
}

/// Process Drop / Hit presses into controller commands.
pub fn panel_command_button_system(
    tuning: Res<TuningValues>,
    active: Res<ActiveBall>,
    mut drops: MessageWriter<DropBall>,
    mut hits: MessageWriter<HitBall>,
    query: Query<(&Interaction, &PanelCommand), (Changed<Interaction>, With<Button>)>,
) {
    for (interaction, command) in query.iter() {
        if *interaction != Interaction::Pressed {
            continue;
        }
        match command {
            PanelCommand::Drop => {
                drops.write(tuning.drop_command());
            }
            PanelCommand::Hit => {
                // Mirrors the disabled look; the controller would no-op anyway.
                if active.0.is_some() {
                    hits.write(HitBall {
                        force: tuning.hit_force,
                    });
                }
            }
        }
    }
}

/// Keep the Hit button's look in sync with slot emptiness.
pub fn hit_button_sync_system(
    active: Res<ActiveBall>,
    mut query: Query<(&PanelCommand, &mut BackgroundColor), With<Button>>,
) {
    if !active.is_changed() {
        return;
    }
    let enabled = active.0.is_some();
    for (command, mut bg) in query.iter_mut() {
        if *command == PanelCommand::Hit {
            *bg = BackgroundColor(if enabled { hit_bg() } else { hit_disabled_bg() });
        }
    }
}

/// Refresh the bounce counter from change notifications.
pub fn bounce_counter_display_system(
    mut changes: MessageReader<BounceCountChanged>,
    mut query: Query<&mut Text, With<BounceCounterText>>,
) {
    let Some(latest) = changes.read().last() else {
        return;
    };
    for mut text in query.iter_mut() {
        *text = Text::new(format!("{}", latest.count));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_steps_within_its_range() {
        let mut tuning = TuningValues::default();
        for field in TuningField::ALL {
            let (min, max) = field.range();
            // Step down far past the minimum…
            for _ in 0..200 {
                let v = (field.get(&tuning) - field.step()).clamp(min, max);
                field.set(&mut tuning, v);
            }
            assert_eq!(field.get(&tuning), min, "{field:?} must floor at {min}");
            // …and up far past the maximum.
            for _ in 0..200 {
                let v = (field.get(&tuning) + field.step()).clamp(min, max);
                field.set(&mut tuning, v);
            }
            assert_eq!(field.get(&tuning), max, "{field:?} must cap at {max}");
        }
    }

    #[test]
    fn only_body_params_rebuild_the_ball() {
        assert!(!TuningField::DropHeight.rebuilds_ball());
        assert!(!TuningField::BallRadius.rebuilds_ball());
        assert!(!TuningField::HitForce.rebuilds_ball());
        assert!(TuningField::LinearDamping.rebuilds_ball());
        assert!(TuningField::AngularDamping.rebuilds_ball());
        assert!(TuningField::StaticFriction.rebuilds_ball());
        assert!(TuningField::DynamicFriction.rebuilds_ball());
    }

    #[test]
    fn row_formatting_carries_units() {
        assert_eq!(
            TuningField::DropHeight.format_row(0.5),
            "Drop Height: 0.50 m"
        );
        assert_eq!(TuningField::HitForce.format_row(50.0), "Hit Force: 50.0 N");
        assert_eq!(
            TuningField::StaticFriction.format_row(0.5),
            "Static Friction: 0.50"
        );
    }

    #[test]
    fn arming_the_debounce_replaces_a_pending_timer() {
        let mut debounce = RespawnDebounce::default();
        debounce.arm();
        debounce
            .0
            .as_mut()
            .unwrap()
            .tick(std::time::Duration::from_millis(150));
        // 50 ms from firing — a new change must restart the full delay.
        debounce.arm();
        assert_eq!(debounce.0.as_ref().unwrap().elapsed_secs(), 0.0);
    }

    #[test]
    fn drop_command_snapshots_current_values() {
        let mut tuning = TuningValues::default();
        tuning.drop_height = 1.5;
        tuning.ball_radius = 0.1;
        tuning.static_friction = 0.9;
        let drop = tuning.drop_command();
        assert_eq!(drop.position, Vec3::new(0.0, 1.5, 0.0));
        assert_eq!(drop.radius, 0.1);
        assert_eq!(drop.params.static_friction, 0.9);
    }
}
