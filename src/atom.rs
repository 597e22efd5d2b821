//! Display-protocol atoms.
//!
//! An *atom* is a small integer that the display server hands out in place of a string. Device
//! properties, property types, and property values of type `ATOM` are all identified this way.
//! Turning an atom back into its name requires a round trip to the server, which is abstracted by
//! the [`Connection`] trait.

use std::{fmt, io};

ffi_enum! {
    /// A numeric atom handle, scoped to one display server.
    ///
    /// Only the predefined atoms that matter for property decoding have named constants. Every
    /// other handle is still representable and is formatted numerically.
    pub enum AtomId: u32 {
        /// `XA_ATOM`: the type of properties whose values are themselves atoms.
        ATOM     = 4,
        /// `XA_CARDINAL`: unsigned integers.
        CARDINAL = 6,
        /// `XA_INTEGER`: signed integers.
        INTEGER  = 19,
        /// `XA_STRING`: NUL-terminated Latin-1 strings.
        STRING   = 31,
    }
}

impl AtomId {
    /// The reserved `None` atom, which never names anything.
    pub const NONE: Self = Self(0);
}

impl fmt::Debug for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.variant_name() {
            Some(name) => write!(f, "XA_{name}"),
            None => write!(f, "AtomId({})", self.0),
        }
    }
}

impl fmt::Display for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A live connection to a display server that can translate between atoms and names.
///
/// Implementations perform a blocking round trip per call; callers that look up the same atoms
/// repeatedly may want to cache the results themselves.
pub trait Connection {
    /// Returns the name the server associates with `atom`.
    ///
    /// Fails if the connection is gone or the server does not know `atom`. Implementations must
    /// not return an empty string in place of an error.
    fn atom_name(&self, atom: AtomId) -> io::Result<String>;

    /// Looks up the atom for `name`.
    ///
    /// If `only_if_exists` is `true`, the atom is not created on the server and `Ok(None)` is
    /// returned when nobody has interned `name` yet.
    fn intern_atom(&self, name: &str, only_if_exists: bool) -> io::Result<Option<AtomId>>;
}

/// An atom together with its resolved name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Atom {
    id: AtomId,
    name: String,
}

impl Atom {
    /// Resolves `id` against `conn`.
    ///
    /// Errors from the connection are propagated unchanged. [`AtomId::NONE`] is rejected without
    /// contacting the server.
    pub fn resolve<C: Connection + ?Sized>(id: AtomId, conn: &C) -> io::Result<Self> {
        if id == AtomId::NONE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "the `None` atom has no name",
            ));
        }
        let name = conn.atom_name(id)?;
        Ok(Self { id, name })
    }

    /// Returns the numeric handle.
    #[inline]
    pub fn id(&self) -> AtomId {
        self.id
    }

    /// Returns the name the server reported for this atom.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
