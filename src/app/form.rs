//! The four numeric text fields and their keyboard focus.

use std::fmt;

use log::debug;

use super::controller::SpawnInput;
use super::error::{parse_number, InputError};
use crate::math::{Rect, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    Mass1,
    Velocity1,
    Mass2,
    Velocity2,
}

impl FieldId {
    /// Form order, which is also the index into the field array.
    pub const ALL: [FieldId; 4] = [
        FieldId::Mass1,
        FieldId::Velocity1,
        FieldId::Mass2,
        FieldId::Velocity2,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldId::Mass1 => "Mass 1",
            FieldId::Velocity1 => "Velocity 1",
            FieldId::Mass2 => "Mass 2",
            FieldId::Velocity2 => "Velocity 2",
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputField {
    pub id: FieldId,
    pub rect: Rect,
    pub label: String,
    pub text: String,
    /// Last value committed with Enter.
    pub value: Option<f64>,
}

impl InputField {
    fn new(id: FieldId, rect: Rect) -> Self {
        Self {
            id,
            rect,
            label: format!("{}:", id.name()),
            text: String::new(),
            value: None,
        }
    }
}

/// Keys with editing meaning. Everything printable arrives as text instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Enter,
    Backspace,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputForm {
    fields: [InputField; 4],
    focus: Option<FieldId>,
}

impl InputForm {
    pub fn new(rects: [Rect; 4]) -> Self {
        Self {
            fields: FieldId::ALL.map(|id| InputField::new(id, rects[id.index()])),
            focus: None,
        }
    }

    pub fn fields(&self) -> &[InputField; 4] {
        &self.fields
    }

    pub fn field(&self, id: FieldId) -> &InputField {
        &self.fields[id.index()]
    }

    pub fn focus(&self) -> Option<FieldId> {
        self.focus
    }

    /// Focuses the field under `position`. A click outside every field keeps the
    /// current focus. Returns the field that was hit.
    pub fn handle_pointer(&mut self, position: Vec2) -> Option<FieldId> {
        let hit = self
            .fields
            .iter()
            .find(|field| field.rect.contains(position))
            .map(|field| field.id)?;
        self.focus = Some(hit);
        Some(hit)
    }

    /// Enter commits the focused buffer, Backspace drops its last character.
    /// Without focus nothing happens.
    pub fn handle_key(&mut self, key: EditKey) -> Option<Result<f64, InputError>> {
        let id = self.focus?;
        let field = &mut self.fields[id.index()];
        match key {
            EditKey::Backspace => {
                field.text.pop();
                None
            }
            EditKey::Enter => {
                let result = parse_number(id, &field.text);
                match &result {
                    Ok(value) => {
                        field.value = Some(*value);
                        self.focus = None;
                    }
                    Err(err) => {
                        debug!("cleared {}: {}", id, err);
                        field.text.clear();
                    }
                }
                Some(result)
            }
        }
    }

    /// Appends a typed character to the focused field verbatim. Control
    /// characters are dropped.
    pub fn handle_text(&mut self, ch: char) {
        if ch.is_control() {
            return;
        }
        if let Some(id) = self.focus {
            self.fields[id.index()].text.push(ch);
        }
    }

    /// Current text of all four fields, for a spawn attempt.
    pub fn spawn_input(&self) -> SpawnInput {
        SpawnInput {
            mass1: self.field(FieldId::Mass1).text.clone(),
            velocity1: self.field(FieldId::Velocity1).text.clone(),
            mass2: self.field(FieldId::Mass2).text.clone(),
            velocity2: self.field(FieldId::Velocity2).text.clone(),
        }
    }
}
