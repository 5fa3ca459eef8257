// src/math/alignment/yield_point.rs

//! Scheduler-unabhängige Abgabepunkte für die Ausrichtungssuche.
//!
//! Die Suche ruft `yield_now` auf, sobald ihr Zeitbudget verbraucht ist. Ein
//! Event-Loop-Host setzt hier eine Fortsetzung ab, ein Host mit eigenen Threads
//! kann nichts tun oder den Thread abgeben. Das Suchergebnis hängt nicht davon ab.

use bevy::tasks::futures_lite::future;
use std::future::Future;

pub trait YieldPoint: Send {
    fn yield_now(&mut self) -> impl Future<Output = ()> + Send;
}

/// Gibt nie ab (blockierende Aufrufer, Tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoYield;

impl YieldPoint for NoYield {
    fn yield_now(&mut self) -> impl Future<Output = ()> + Send {
        std::future::ready(())
    }
}

/// Gibt einmal an den Executor zurück (Task-Pools, Event-Loops)
#[derive(Debug, Clone, Copy, Default)]
pub struct CooperativeYield;

impl YieldPoint for CooperativeYield {
    fn yield_now(&mut self) -> impl Future<Output = ()> + Send {
        future::yield_now()
    }
}

/// Gibt den Betriebssystem-Thread ab
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadYield;

impl YieldPoint for ThreadYield {
    fn yield_now(&mut self) -> impl Future<Output = ()> + Send {
        std::thread::yield_now();
        std::future::ready(())
    }
}
