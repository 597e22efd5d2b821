#![doc = include_str!("../README.md")]
#![warn(missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
mod macros;


pub mod atom;
pub mod calibration;
pub mod mapping;
pub mod matrix;
pub mod property;
pub mod screen;

#[doc(inline)]
pub use atom::{Atom, AtomId, Connection};
#[doc(inline)]
pub use calibration::{
    CalibrationDevice, CalibrationOutcome, ConfigStatus, DeviceCapability, read_matrix,
    write_matrix,
};
#[doc(inline)]
pub use mapping::{Mapping, MappingReport};
#[doc(inline)]
pub use matrix::TransformationMatrix;
#[doc(inline)]
pub use property::{DecodeError, PropertyType, PropertyValue, RawProperty, decode};
#[doc(inline)]
pub use screen::{Position, Rectangle, Screen};
