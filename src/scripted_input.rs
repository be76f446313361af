use glam::Vec2;
use serde::Deserialize;
use std::{fs, path::Path};
use tilecraft_core::{ClickKind, PointerAction, TickInput};

#[derive(Debug, Deserialize)]
struct ScriptedInputFile {
    steps: Vec<ScriptedStep>,
}

#[derive(Debug, Clone, Deserialize)]
struct ScriptedStep {
    ticks: u64,
    #[serde(default)]
    left: bool,
    #[serde(default)]
    right: bool,
    #[serde(default)]
    jump: bool,
    #[serde(default)]
    click: Option<ClickKind>,
    /// Pointer offset from the body center, in world units.
    #[serde(default)]
    aim: [f32; 2],
    #[serde(default)]
    select_slot: Option<usize>,
    #[serde(default)]
    toggle_crafting: bool,
    #[serde(default)]
    craft_recipe: Option<usize>,
}

/// Replays a JSON list of held inputs, one step after another.
///
/// Held directions apply for every tick of a step. Jumps, clicks and menu
/// commands fire once, on the first tick of their step.
pub struct ScriptedInputPlayer {
    steps: Vec<ScriptedStep>,
    index: usize,
    tick_in_step: u64,
}

impl ScriptedInputPlayer {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> anyhow::Result<Self> {
        let file: ScriptedInputFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            anyhow::bail!("scripted input file contains no steps");
        }
        Ok(Self {
            steps: file.steps.into_iter().filter(|step| step.ticks > 0).collect(),
            index: 0,
            tick_in_step: 0,
        })
    }

    /// Total ticks covered by the script.
    pub fn total_ticks(&self) -> u64 {
        self.steps.iter().map(|step| step.ticks).sum()
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.steps.len()
    }

    /// Input for the next tick, or `None` once every step has played.
    pub fn advance(&mut self, body_center: Vec2) -> Option<TickInput> {
        let step = self.steps.get(self.index)?;
        let first_tick = self.tick_in_step == 0;
        let input = step.to_tick_input(first_tick, body_center);

        self.tick_in_step += 1;
        if self.tick_in_step >= step.ticks {
            self.index += 1;
            self.tick_in_step = 0;
        }
        Some(input)
    }
}

impl ScriptedStep {
    fn to_tick_input(&self, first_tick: bool, body_center: Vec2) -> TickInput {
        let mut input = TickInput {
            move_left: self.left,
            move_right: self.right,
            ..TickInput::idle()
        };
        if first_tick {
            input.jump = self.jump;
            input.pointer = self.click.map(|click| {
                let at = body_center + Vec2::from(self.aim);
                PointerAction::new(at.x, at.y, click)
            });
            input.select_slot = self.select_slot;
            input.toggle_crafting = self.toggle_crafting;
            input.craft_recipe = self.craft_recipe;
        }
        input
    }
}
