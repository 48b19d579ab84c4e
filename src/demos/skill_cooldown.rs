//! Skill cooldown demo
//!
//! Three skill buttons along the bottom, fired with 1/2/3 or a click. Each
//! has its own cooldown; a dark overlay on the button shrinks as it
//! recovers. Presses during cooldown are rejected and counted.

use macroquad::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::standard_command;
use crate::config::{require_positive, DemoTuning};
use crate::game::{Cooldown, EmitterDef, ParticlePool, Scene, SceneCommand, SceneContext, TextureCache};
use crate::input::Action;
use crate::ui::{self, hud};

pub const SKILL_COUNT: usize = 3;
const SKILL_NAMES: [&str; SKILL_COUNT] = ["Fireball", "Frost Nova", "Meteor"];
const SKILL_KEYS: [Action; SKILL_COUNT] = [Action::Skill1, Action::Skill2, Action::Skill3];
const BUTTON_SIZE: f32 = 72.0;
const BUTTON_GAP: f32 = 24.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillConfig {
    /// Seconds per skill, in button order
    pub cooldowns: [f32; SKILL_COUNT],
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self { cooldowns: [1.5, 3.0, 6.0] }
    }
}

impl SkillConfig {
    pub fn validate(&self) -> Result<(), String> {
        for (i, c) in self.cooldowns.iter().enumerate() {
            require_positive(&format!("cooldowns[{}]", i), *c)?;
        }
        Ok(())
    }
}

/// Button rectangle for skill `index`, centred along the bottom edge
pub fn button_rect(index: usize, screen: Vec2) -> Rect {
    let total = SKILL_COUNT as f32 * BUTTON_SIZE + (SKILL_COUNT - 1) as f32 * BUTTON_GAP;
    let x = (screen.x - total) * 0.5 + index as f32 * (BUTTON_SIZE + BUTTON_GAP);
    let y = screen.y - BUTTON_SIZE - 48.0;
    Rect::new(x, y, BUTTON_SIZE, BUTTON_SIZE)
}

fn skill_effect(index: usize) -> EmitterDef {
    match index {
        0 => EmitterDef::fire(),
        1 => EmitterDef::snow(),
        _ => EmitterDef::sparks(),
    }
}

pub struct SkillCooldownScene {
    config: SkillConfig,
    cooldowns: Vec<Cooldown>,
    uses: [u32; SKILL_COUNT],
    rejected: u32,
    particles: ParticlePool,
    screen: Vec2,
}

impl SkillCooldownScene {
    pub fn new(config: SkillConfig) -> Self {
        let cooldowns = config.cooldowns.iter().map(|&d| Cooldown::new(d)).collect();
        Self {
            config,
            cooldowns,
            uses: [0; SKILL_COUNT],
            rejected: 0,
            particles: ParticlePool::new(),
            screen: vec2(800.0, 600.0),
        }
    }

    fn activate(&mut self, ctx: &mut SceneContext, index: usize) {
        let Some(cooldown) = self.cooldowns.get_mut(index) else {
            return;
        };
        if !cooldown.trigger() {
            self.rejected += 1;
            ctx.signals.emit(
                "skill_rejected",
                json!({ "skill": index + 1, "remaining": cooldown.remaining() }),
            );
            return;
        }

        self.uses[index] += 1;
        let origin = vec2(self.screen.x * 0.5, self.screen.y * 0.4);
        self.particles.spawn_burst(&skill_effect(index), origin, 30);
        ctx.signals.emit(
            "skill_used",
            json!({ "skill": index + 1, "name": SKILL_NAMES[index], "cooldown": cooldown.duration() }),
        );
    }

    fn publish(&self, ctx: &mut SceneContext) {
        let ready: Vec<bool> = self.cooldowns.iter().map(Cooldown::is_ready).collect();
        let remaining: Vec<i64> = self
            .cooldowns
            .iter()
            .map(|c| (c.remaining() * 1000.0).round() as i64)
            .collect();
        ctx.signals.set("skillReady", ready);
        ctx.signals.set("cooldownRemainingMs", remaining);
        ctx.signals.set("skillUses", self.uses);
        ctx.signals.set("rejectedPresses", self.rejected);
    }
}

pub fn build(tuning: &DemoTuning) -> Box<dyn Scene> {
    Box::new(SkillCooldownScene::new(tuning.skills.clone()))
}

impl Scene for SkillCooldownScene {
    fn name(&self) -> &'static str {
        "skill_cooldown"
    }

    fn preload(&mut self, textures: &mut TextureCache) {
        let colors = [ui::HEALTH_LOW, ui::ACCENT_COLOR, ui::HEALTH_CRITICAL];
        for (i, color) in colors.iter().enumerate() {
            let size = BUTTON_SIZE as u16;
            textures.outlined_rect(&format!("skill{}", i + 1), size, size, *color, ui::TEXT_COLOR);
        }
    }

    fn create(&mut self, ctx: &mut SceneContext) {
        self.screen = ctx.screen;
        ctx.signals.emit("scene_created", json!({ "cooldowns": self.config.cooldowns }));
        self.publish(ctx);
    }

    fn update(&mut self, ctx: &mut SceneContext, delta_time: f32) -> SceneCommand {
        let command = standard_command(&ctx.input);
        if command != SceneCommand::Continue {
            return command;
        }

        for cooldown in &mut self.cooldowns {
            cooldown.tick(delta_time);
        }

        for (i, key) in SKILL_KEYS.iter().enumerate() {
            if ctx.input.is_pressed(*key) {
                self.activate(ctx, i);
            }
        }
        if ctx.input.clicked {
            let clicked = (0..SKILL_COUNT).find(|&i| button_rect(i, self.screen).contains(ctx.input.mouse));
            if let Some(i) = clicked {
                self.activate(ctx, i);
            }
        }

        self.particles.update(delta_time);
        self.publish(ctx);
        SceneCommand::Continue
    }

    fn draw(&self, ctx: &SceneContext, textures: &TextureCache) {
        self.particles.draw(Vec2::ZERO);

        for (i, cooldown) in self.cooldowns.iter().enumerate() {
            let rect = button_rect(i, ctx.screen);
            let center = vec2(rect.x + rect.w * 0.5, rect.y + rect.h * 0.5);
            textures.draw_centered(&format!("skill{}", i + 1), center, vec2(rect.w, rect.h), WHITE);
            hud::draw_cooldown_overlay(rect, cooldown.fraction_remaining());

            draw_text(&format!("{}", i + 1), rect.x + 6.0, rect.y + 18.0, ui::FONT_SIZE_CONTENT, ui::TEXT_COLOR);
            let label = if cooldown.is_ready() {
                SKILL_NAMES[i].to_string()
            } else {
                format!("{:.1}s", cooldown.remaining())
            };
            let dims = measure_text(&label, None, ui::FONT_SIZE_SMALL as u16, 1.0);
            draw_text(
                &label,
                center.x - dims.width * 0.5,
                rect.y + rect.h + 16.0,
                ui::FONT_SIZE_SMALL,
                ui::TEXT_COLOR,
            );
        }

        hud::draw_lines(
            16.0,
            16.0,
            &[
                format!("Uses: {} / {} / {}", self.uses[0], self.uses[1], self.uses[2]),
                format!("Rejected presses: {}", self.rejected),
            ],
        );
        hud::draw_hint(ctx.screen, "Skills: 1 2 3 or click   Restart: R   Menu: Esc");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::FrameInput;

    fn scene() -> (SkillCooldownScene, SceneContext) {
        let mut scene = SkillCooldownScene::new(SkillConfig::default());
        let mut ctx = SceneContext::new(vec2(800.0, 600.0), false);
        scene.create(&mut ctx);
        (scene, ctx)
    }

    fn step(scene: &mut SkillCooldownScene, ctx: &mut SceneContext, input: FrameInput, dt: f32) {
        ctx.begin_frame(input, dt);
        scene.update(ctx, dt);
    }

    #[test]
    fn test_skill_blocked_until_cooldown_elapsed() {
        let (mut scene, mut ctx) = scene();
        let press = FrameInput::new().press(Action::Skill1);
        step(&mut scene, &mut ctx, press.clone(), 0.016);
        assert_eq!(scene.uses[0], 1);

        step(&mut scene, &mut ctx, press.clone(), 1.0);
        assert_eq!(scene.uses[0], 1);
        assert_eq!(scene.rejected, 1);

        step(&mut scene, &mut ctx, press, 0.5);
        assert_eq!(scene.uses[0], 2);
    }

    #[test]
    fn test_cooldowns_are_independent() {
        let (mut scene, mut ctx) = scene();
        let all = FrameInput::new()
            .press(Action::Skill1)
            .press(Action::Skill2)
            .press(Action::Skill3);
        step(&mut scene, &mut ctx, all.clone(), 0.016);
        assert_eq!(scene.uses, [1, 1, 1]);

        step(&mut scene, &mut ctx, FrameInput::new(), 3.0);
        step(&mut scene, &mut ctx, all, 0.016);
        assert_eq!(scene.uses, [2, 2, 1]);
        assert_eq!(scene.rejected, 1);
        assert_eq!(ctx.signals.count("skill_rejected"), 1);
    }

    #[test]
    fn test_click_on_button_fires_skill() {
        let (mut scene, mut ctx) = scene();
        let rect = button_rect(2, vec2(800.0, 600.0));
        let input = FrameInput::new().click(rect.x + 5.0, rect.y + 5.0);
        step(&mut scene, &mut ctx, input, 0.016);
        assert_eq!(scene.uses, [0, 0, 1]);

        // Outside every button does nothing
        step(&mut scene, &mut ctx, FrameInput::new().click(5.0, 5.0), 0.016);
        assert_eq!(scene.uses, [0, 0, 1]);
        assert_eq!(scene.rejected, 0);
    }

    #[test]
    fn test_buttons_do_not_overlap() {
        let screen = vec2(800.0, 600.0);
        assert!(!button_rect(0, screen).overlaps(&button_rect(1, screen)));
        assert!(button_rect(2, screen).right() < screen.x);
    }
}
