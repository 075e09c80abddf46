use alloc::vec::Vec;
use core::fmt;

use super::{ObjectId, ObjectRef, SequenceNumber};
use crate::{
    ByteReader, ByteWriter, Deserializable, DeserializationError, Serializable, SerializationError,
};

// ARGUMENT
// ================================================================================================

/// An argument to a programmable transaction command.
///
/// | tag | variant        | payload  |
/// |-----|----------------|----------|
/// | 0   | `GasCoin`      | none     |
/// | 1   | `Input`        | u16      |
/// | 2   | `Result`       | u16      |
/// | 3   | `NestedResult` | u16, u16 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Argument {
    /// The gas coin of the transaction.
    GasCoin,
    /// One of the transaction inputs.
    Input(u16),
    /// The result of another command.
    Result(u16),
    /// One value out of a command returning several results.
    NestedResult(u16, u16),
}

/// The discriminant of an [Argument], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ArgumentKind {
    GasCoin = 0,
    Input = 1,
    Result = 2,
    NestedResult = 3,
}

impl Argument {
    pub const fn kind(&self) -> ArgumentKind {
        match self {
            Self::GasCoin => ArgumentKind::GasCoin,
            Self::Input(_) => ArgumentKind::Input,
            Self::Result(_) => ArgumentKind::Result,
            Self::NestedResult(..) => ArgumentKind::NestedResult,
        }
    }
}

impl TryFrom<u32> for ArgumentKind {
    type Error = DeserializationError;

    fn try_from(tag: u32) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Self::GasCoin),
            1 => Ok(Self::Input),
            2 => Ok(Self::Result),
            3 => Ok(Self::NestedResult),
            _ => Err(DeserializationError::UnknownVariant {
                type_name: "Argument",
                tag: tag.into(),
            }),
        }
    }
}

impl Serializable for Argument {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        target.write_variant(self.kind() as u32, |target| {
            match *self {
                Self::GasCoin => {},
                Self::Input(index) | Self::Result(index) => target.write_u16(index),
                Self::NestedResult(command, result) => {
                    target.write_u16(command);
                    target.write_u16(result);
                },
            }
            Ok(())
        })
    }

    fn get_size_hint(&self) -> usize {
        match self {
            Self::GasCoin => 1,
            Self::Input(_) | Self::Result(_) => 3,
            Self::NestedResult(..) => 5,
        }
    }
}

impl Deserializable for Argument {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        source.read_variant(
            "Argument",
            &[
                |_| Ok(Self::GasCoin),
                |source| Ok(Self::Input(source.read_u16()?)),
                |source| Ok(Self::Result(source.read_u16()?)),
                |source| Ok(Self::NestedResult(source.read_u16()?, source.read_u16()?)),
            ],
        )
    }
}

// OBJECT ARG
// ================================================================================================

/// How an object is passed into a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectArg {
    /// An immutable object or one owned by the sender.
    ImmOrOwnedObject(ObjectRef),
    /// A shared object, identified by the version at which it became shared.
    SharedObject {
        id: ObjectId,
        initial_shared_version: SequenceNumber,
        mutable: bool,
    },
    /// An object sent to another object, to be received in this transaction.
    Receiving(ObjectRef),
}

impl ObjectArg {
    pub const fn id(&self) -> ObjectId {
        match self {
            Self::ImmOrOwnedObject(object_ref) | Self::Receiving(object_ref) => {
                object_ref.object_id
            },
            Self::SharedObject { id, .. } => *id,
        }
    }
}

impl Serializable for ObjectArg {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        match self {
            Self::ImmOrOwnedObject(object_ref) => target.write_variant(0, |t| t.write(object_ref)),
            Self::SharedObject { id, initial_shared_version, mutable } => {
                target.write_variant(1, |target| {
                    target.write(id)?;
                    target.write(initial_shared_version)?;
                    target.write_bool(*mutable);
                    Ok(())
                })
            },
            Self::Receiving(object_ref) => target.write_variant(2, |t| t.write(object_ref)),
        }
    }
}

impl Deserializable for ObjectArg {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        source.read_variant(
            "ObjectArg",
            &[
                |source| Ok(Self::ImmOrOwnedObject(source.read()?)),
                |source| {
                    Ok(Self::SharedObject {
                        id: source.read()?,
                        initial_shared_version: source.read()?,
                        mutable: source.read_bool()?,
                    })
                },
                |source| Ok(Self::Receiving(source.read()?)),
            ],
        )
    }
}

// CALL ARG
// ================================================================================================

/// An input of a programmable transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CallArg {
    /// BCS bytes of a pure value such as an integer, address or vector of those.
    Pure(Vec<u8>),
    Object(ObjectArg),
}

impl Serializable for CallArg {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        match self {
            Self::Pure(bytes) => target.write_variant(0, |t| t.write_byte_seq(bytes)),
            Self::Object(object) => target.write_variant(1, |t| t.write(object)),
        }
    }
}

impl Deserializable for CallArg {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        source.read_variant(
            "CallArg",
            &[
                |source| Ok(Self::Pure(source.read_byte_seq()?)),
                |source| Ok(Self::Object(source.read()?)),
            ],
        )
    }
}

// BOOL
// ================================================================================================

/// A boolean value passed around as a standalone serializable.
///
/// Encodes exactly like `bool` and compares equal to plain `bool` values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bool(pub bool);

impl Bool {
    pub const fn value(&self) -> bool {
        self.0
    }
}

impl From<bool> for Bool {
    fn from(value: bool) -> Self {
        Self(value)
    }
}

impl From<Bool> for bool {
    fn from(value: Bool) -> Self {
        value.0
    }
}

impl PartialEq<bool> for Bool {
    fn eq(&self, other: &bool) -> bool {
        self.0 == *other
    }
}

impl PartialEq<Bool> for bool {
    fn eq(&self, other: &Bool) -> bool {
        *self == other.0
    }
}

impl fmt::Display for Bool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serializable for Bool {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        target.write_bool(self.0);
        Ok(())
    }

    fn get_size_hint(&self) -> usize {
        1
    }
}

impl Deserializable for Bool {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        source.read_bool().map(Self)
    }
}

// OBJECT ARGUMENTS
// ================================================================================================

/// An object produced inside the transaction being built, such as the result of a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransactionObjectArgument {
    pub argument: Argument,
}

impl TransactionObjectArgument {
    pub const fn new(argument: Argument) -> Self {
        Self { argument }
    }
}

impl From<Argument> for TransactionObjectArgument {
    fn from(argument: Argument) -> Self {
        Self::new(argument)
    }
}

impl Serializable for TransactionObjectArgument {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        self.argument.write_into(target)
    }

    fn get_size_hint(&self) -> usize {
        self.argument.get_size_hint()
    }
}

impl Deserializable for TransactionObjectArgument {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        Argument::read_from(source).map(Self::new)
    }

    fn min_serialized_size() -> usize {
        Argument::min_serialized_size()
    }
}

/// Which kind of [ObjectArgument] a value is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectArgumentType {
    ObjectCallArg,
    TransactionObjectArgument,
}

/// Anything a command accepts where an object is expected: either an object input that still
/// has to be registered with the transaction, or an object already available inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectArgument {
    Call(ObjectArg),
    Transaction(TransactionObjectArgument),
}

impl ObjectArgument {
    pub const fn argument_type(&self) -> ObjectArgumentType {
        match self {
            Self::Call(_) => ObjectArgumentType::ObjectCallArg,
            Self::Transaction(_) => ObjectArgumentType::TransactionObjectArgument,
        }
    }
}

impl From<ObjectArg> for ObjectArgument {
    fn from(object: ObjectArg) -> Self {
        Self::Call(object)
    }
}

impl From<TransactionObjectArgument> for ObjectArgument {
    fn from(object: TransactionObjectArgument) -> Self {
        Self::Transaction(object)
    }
}

impl From<Argument> for ObjectArgument {
    fn from(argument: Argument) -> Self {
        Self::Transaction(argument.into())
    }
}
