//! Room Sensor Dialog - conversation service for office sensors.
//!
//! Relays chat turns to a hosted dialog engine and, when the scripted reply
//! asks for it, enriches the answer with device listings and latest sensor
//! readings from an IoT telemetry platform.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
