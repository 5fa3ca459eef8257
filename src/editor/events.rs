// src/editor/events.rs
use crate::math::{alignment::SearchOutcome, geometry::Region};
use bevy::prelude::*;

/// Bearbeitung der Region über die Boolesche Kombination
#[derive(Event, Debug, Clone)]
pub enum RegionEdit {
    Union(Region),
    Subtract(Region),
    Replace(Option<Region>),
}

/// Startet eine Suche für den aktuellen Zustand; eine laufende wird vorher beendet.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct RequestAlignment;

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct CancelAlignment;

/// Wird für jede beendete Suche gesendet, auch für abgebrochene.
#[derive(Event, Debug, Clone, Copy)]
pub struct AlignmentFinished(pub SearchOutcome);
