#![deny(
    warnings,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    rust_2018_idioms,
    missing_docs,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
#![doc = r"Data model for the Azrael physics orchestrator.

This crate defines the types every other Azrael crate builds on: rigid
[`Body`] records, their [`Shape`]s and [`Booster`] actuators, the
[`Command`] variants the façade enqueues, and the transient per-tick
[`ContactPair`] and island bookkeeping. None of these types know how they
are stored, queued, or dispatched — that's `azrael-store`, `azrael-queue`,
and `azrael-worker`.
"]

mod body;
mod booster;
mod command;
mod contact;
mod shape;
mod templates;

pub use body::{AabbData, Body, BodyId, QuatData, Vec3Data};
pub use booster::Booster;
pub use command::{BodyPatch, Command, CommandError};
pub use contact::ContactPair;
pub use shape::Shape;
pub use templates::{TemplateId, TemplateRegistry};
