//! Decoding of device property values.
//!
//! Devices driven through the legacy input extension expose *properties*: named, typed,
//! variable-length attributes. The server hands out a property as a byte buffer plus three pieces
//! of metadata (a type atom, a storage width in bits, and an element count), and the shape of the
//! value is only known once those arrive. [`decode`] turns that combination into a typed
//! [`PropertyValue`].
//!
//! Which [`PropertyValue`] variant is produced is fully determined by the [`PropertyType`] and the
//! storage width:
//!
//! | Type                       | Width 8          | Width 16          | Width 32          |
//! |----------------------------|------------------|-------------------|-------------------|
//! | [`PropertyType::Integer`]  | `Int8`           | `Int16`           | `Int32`           |
//! | [`PropertyType::Cardinal`] | `Card8`          | `Card16`          | `Card32`          |
//! | [`PropertyType::Atom`]     | `Atoms`          | `Atoms`           | `Atoms`           |
//! | [`PropertyType::String`]   | `Strings` (width ignored)                                |
//! | [`PropertyType::Float`]    | `Float` (width ignored)                                  |
//!
//! Every other combination is a [`DecodeError`].

#[cfg(test)]
mod tests;

use std::{error::Error, fmt, io};

use crate::atom::{Atom, AtomId, Connection};

/// Name of the atom that identifies 32-bit floating point properties.
///
/// Unlike the integer and string types, `FLOAT` is not a predefined atom; it only exists on a
/// server once some client (usually the input driver) has interned it.
pub const FLOAT_TYPE_NAME: &str = "FLOAT";

/// The semantic type of a property, derived from its type atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    /// Signed integers ([`AtomId::INTEGER`]).
    Integer,
    /// Unsigned integers ([`AtomId::CARDINAL`]).
    Cardinal,
    /// NUL-terminated strings ([`AtomId::STRING`]).
    String,
    /// Atom handles ([`AtomId::ATOM`]).
    Atom,
    /// A 32-bit float (the server's `FLOAT` atom).
    Float,
    /// Any other type atom. Decoding such a property always fails.
    Unknown(AtomId),
}

impl PropertyType {
    /// Determines the [`PropertyType`] a type atom stands for.
    ///
    /// The `FLOAT` type is only recognized if `conn` already knows the `FLOAT` atom; this call
    /// never interns it. If the server has no such atom, no property can have that type, and `ty`
    /// is reported as [`PropertyType::Unknown`].
    pub fn classify<C: Connection + ?Sized>(ty: AtomId, conn: &C) -> io::Result<Self> {
        Ok(match ty {
            AtomId::INTEGER => Self::Integer,
            AtomId::CARDINAL => Self::Cardinal,
            AtomId::STRING => Self::String,
            AtomId::ATOM => Self::Atom,
            _ => match conn.intern_atom(FLOAT_TYPE_NAME, true)? {
                Some(float) if float == ty => Self::Float,
                _ => Self::Unknown(ty),
            },
        })
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => f.write_str("INTEGER"),
            Self::Cardinal => f.write_str("CARDINAL"),
            Self::String => f.write_str("STRING"),
            Self::Atom => f.write_str("ATOM"),
            Self::Float => f.write_str(FLOAT_TYPE_NAME),
            Self::Unknown(atom) => write!(f, "<type atom {atom}>"),
        }
    }
}

/// A property value exactly as the server returned it, before decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProperty {
    ty: AtomId,
    format: u8,
    items: usize,
    data: Vec<u8>,
}

impl RawProperty {
    /// Creates a [`RawProperty`] from the metadata and bytes returned by the server.
    ///
    /// `data` holds the elements in the client's native byte order.
    pub fn new(ty: AtomId, format: u8, items: usize, data: Vec<u8>) -> Self {
        Self {
            ty,
            format,
            items,
            data,
        }
    }

    /// Returns the type atom of the property.
    #[inline]
    pub fn ty(&self) -> AtomId {
        self.ty
    }

    /// Returns the storage width of each element, in bits.
    #[inline]
    pub fn format(&self) -> u8 {
        self.format
    }

    /// Returns the number of logical elements in the value.
    #[inline]
    pub fn items(&self) -> usize {
        self.items
    }

    /// Returns the raw value bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Classifies the type atom and decodes the value.
    pub fn decode<C: Connection + ?Sized>(&self, conn: &C) -> io::Result<PropertyValue> {
        let ty = PropertyType::classify(self.ty, conn)?;
        Ok(decode(ty, self.format, self.items, &self.data, conn)?)
    }
}

/// A decoded property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// `INTEGER` values stored in 8 bits.
    Int8(Vec<i8>),
    /// `INTEGER` values stored in 16 bits.
    Int16(Vec<i16>),
    /// `INTEGER` values stored in 32 bits.
    Int32(Vec<i32>),
    /// `CARDINAL` values stored in 8 bits.
    Card8(Vec<u8>),
    /// `CARDINAL` values stored in 16 bits.
    Card16(Vec<u16>),
    /// `CARDINAL` values stored in 32 bits.
    Card32(Vec<u32>),
    /// `STRING` values, one entry per NUL-terminated string.
    Strings(Vec<String>),
    /// `ATOM` values with their names resolved.
    Atoms(Vec<Atom>),
    /// The first value of a `FLOAT` property.
    Float(f32),
}

impl PropertyValue {
    /// Returns the number of elements in the value.
    ///
    /// A [`PropertyValue::Float`] always counts as a single element.
    pub fn len(&self) -> usize {
        match self {
            Self::Int8(v) => v.len(),
            Self::Int16(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::Card8(v) => v.len(),
            Self::Card16(v) => v.len(),
            Self::Card32(v) => v.len(),
            Self::Strings(v) => v.len(),
            Self::Atoms(v) => v.len(),
            Self::Float(_) => 1,
        }
    }

    /// Returns whether the value has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An error that occurred while decoding a property value.
#[derive(Debug)]
#[non_exhaustive]
pub enum DecodeError {
    /// The storage width is not valid for the property type.
    UnsupportedWidth {
        /// The property type.
        ty: PropertyType,
        /// The declared storage width, in bits.
        format: u8,
    },
    /// The type atom does not name a type this crate can decode.
    UnrecognizedType(AtomId),
    /// The buffer holds fewer bytes than the declared elements need.
    Truncated {
        /// The property type.
        ty: PropertyType,
        /// The declared number of elements.
        items: usize,
        /// The length of the buffer, in bytes.
        len: usize,
    },
    /// An atom in an `ATOM`-typed value could not be resolved.
    Resolve {
        /// The atom that failed to resolve.
        atom: AtomId,
        /// The error reported by the connection.
        source: io::Error,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedWidth { ty, format } => {
                write!(f, "unsupported {ty} width: {format} bits")
            }
            Self::UnrecognizedType(atom) => write!(f, "unrecognized property type {atom}"),
            Self::Truncated { ty, items, len } => write!(
                f,
                "{ty} property with {items} elements does not fit in {len} bytes"
            ),
            Self::Resolve { atom, .. } => write!(f, "failed to resolve atom {atom}"),
        }
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Resolve { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DecodeError> for io::Error {
    fn from(value: DecodeError) -> Self {
        let kind = match &value {
            DecodeError::Resolve { source, .. } => source.kind(),
            _ => io::ErrorKind::InvalidData,
        };
        io::Error::new(kind, value)
    }
}

/// Decodes `items` elements of a property of type `ty` from `data`.
///
/// `format` is the storage width of each element in bits, as reported by the server. Integer
/// elements are read in native byte order. `data` may be longer than the elements require (the
/// server pads values); trailing bytes are ignored.
///
/// `conn` is only used for [`PropertyType::Atom`] values, where every element is resolved to its
/// name. If any of them fails to resolve, the whole call fails.
pub fn decode<C: Connection + ?Sized>(
    ty: PropertyType,
    format: u8,
    items: usize,
    data: &[u8],
    conn: &C,
) -> Result<PropertyValue, DecodeError> {
    use PropertyType as T;
    use PropertyValue as V;

    let value = match (ty, format) {
        (T::Integer, 8) => V::Int8(elements(ty, data, items, i8::from_ne_bytes)?),
        (T::Integer, 16) => V::Int16(elements(ty, data, items, i16::from_ne_bytes)?),
        (T::Integer, 32) => V::Int32(elements(ty, data, items, i32::from_ne_bytes)?),
        (T::Cardinal, 8) => V::Card8(elements(ty, data, items, u8::from_ne_bytes)?),
        (T::Cardinal, 16) => V::Card16(elements(ty, data, items, u16::from_ne_bytes)?),
        (T::Cardinal, 32) => V::Card32(elements(ty, data, items, u32::from_ne_bytes)?),
        (T::Atom, 8) => V::Atoms(resolve_all(
            elements(ty, data, items, |b: [u8; 1]| u32::from(b[0]))?,
            conn,
        )?),
        (T::Atom, 16) => V::Atoms(resolve_all(
            elements(ty, data, items, |b: [u8; 2]| u32::from(u16::from_ne_bytes(b)))?,
            conn,
        )?),
        (T::Atom, 32) => V::Atoms(resolve_all(
            elements(ty, data, items, u32::from_ne_bytes)?,
            conn,
        )?),
        (T::String, _) => V::Strings(strings(data, items)?),
        (T::Float, _) => V::Float(float(data)?),
        (T::Unknown(atom), _) => return Err(DecodeError::UnrecognizedType(atom)),
        (T::Integer | T::Cardinal | T::Atom, _) => {
            return Err(DecodeError::UnsupportedWidth { ty, format });
        }
    };

    log::trace!("decoded {ty} property ({format} bits, {items} elements)");
    Ok(value)
}

fn elements<const N: usize, T>(
    ty: PropertyType,
    data: &[u8],
    items: usize,
    from_bytes: impl Fn([u8; N]) -> T,
) -> Result<Vec<T>, DecodeError> {
    let len = items
        .checked_mul(N)
        .filter(|&len| len <= data.len())
        .ok_or(DecodeError::Truncated {
            ty,
            items,
            len: data.len(),
        })?;

    Ok(data[..len]
        .chunks_exact(N)
        .map(|chunk| {
            let mut bytes = [0; N];
            bytes.copy_from_slice(chunk);
            from_bytes(bytes)
        })
        .collect())
}

fn resolve_all<C: Connection + ?Sized>(
    ids: Vec<u32>,
    conn: &C,
) -> Result<Vec<Atom>, DecodeError> {
    ids.into_iter()
        .map(|raw| {
            let atom = AtomId::from_raw(raw);
            Atom::resolve(atom, conn).map_err(|source| DecodeError::Resolve { atom, source })
        })
        .collect()
}

/// Splits `data` into `items` NUL-terminated strings.
///
/// The terminator of the final string may be missing if the buffer ends right after it. `STRING`
/// is Latin-1, so every byte maps to the code point of the same value.
fn strings(data: &[u8], items: usize) -> Result<Vec<String>, DecodeError> {
    let mut out = Vec::with_capacity(items.min(data.len()));
    let mut rest = data;
    for _ in 0..items {
        if rest.is_empty() {
            return Err(DecodeError::Truncated {
                ty: PropertyType::String,
                items,
                len: data.len(),
            });
        }
        let end = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
        out.push(rest[..end].iter().copied().map(char::from).collect());
        rest = rest.get(end + 1..).unwrap_or_default();
    }
    Ok(out)
}

fn float(data: &[u8]) -> Result<f32, DecodeError> {
    match data.first_chunk::<4>() {
        Some(bytes) => Ok(f32::from_ne_bytes(*bytes)),
        None => Err(DecodeError::Truncated {
            ty: PropertyType::Float,
            items: 1,
            len: data.len(),
        }),
    }
}

/// A device that exposes legacy input-extension properties.
///
/// Implemented by the display-server binding; this crate only consumes it.
pub trait DeviceProperties {
    /// Lists the atoms naming the properties currently set on the device.
    fn property_atoms(&self) -> io::Result<Vec<AtomId>>;

    /// Fetches the raw value of `property`.
    fn raw_property(&self, property: AtomId) -> io::Result<RawProperty>;
}

/// Fetches and decodes a single property of `device`.
pub fn read_property<D, C>(device: &D, conn: &C, property: AtomId) -> io::Result<PropertyValue>
where
    D: DeviceProperties + ?Sized,
    C: Connection + ?Sized,
{
    device.raw_property(property)?.decode(conn)
}

/// Fetches and decodes every property of `device`.
///
/// Property names must resolve, or the whole listing fails. A property whose value cannot be
/// fetched or decoded is returned with its error, and does not affect the others.
pub fn read_properties<D, C>(
    device: &D,
    conn: &C,
) -> io::Result<Vec<(Atom, io::Result<PropertyValue>)>>
where
    D: DeviceProperties + ?Sized,
    C: Connection + ?Sized,
{
    let atoms = device.property_atoms()?;
    let mut out = Vec::with_capacity(atoms.len());
    for id in atoms {
        let atom = Atom::resolve(id, conn)?;
        let value = read_property(device, conn, id);
        if let Err(e) = &value {
            log::debug!("failed to read property '{atom}': {e}");
        }
        out.push((atom, value));
    }
    Ok(out)
}
