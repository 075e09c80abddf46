use alloc::{boxed::Box, vec::Vec};

use super::{Argument, CallArg, Identifier, ObjectId, TypeTag};
use crate::{
    ByteReader, ByteWriter, Deserializable, DeserializationError, Serializable, SerializationError,
};

// PROGRAMMABLE MOVE CALL
// ================================================================================================

/// A call to a Move function: `package::module::function<type_arguments>(arguments)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgrammableMoveCall {
    pub package: ObjectId,
    pub module: Identifier,
    pub function: Identifier,
    pub type_arguments: Vec<TypeTag>,
    pub arguments: Vec<Argument>,
}

impl Serializable for ProgrammableMoveCall {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        target.write(&self.package)?;
        target.write(&self.module)?;
        target.write(&self.function)?;
        target.write(&self.type_arguments)?;
        target.write(&self.arguments)
    }
}

impl Deserializable for ProgrammableMoveCall {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        Ok(Self {
            package: source.read()?,
            module: source.read()?,
            function: source.read()?,
            type_arguments: source.read()?,
            arguments: source.read()?,
        })
    }

    fn min_serialized_size() -> usize {
        ObjectId::min_serialized_size() + 2 * Identifier::min_serialized_size() + 2
    }
}

// COMMAND
// ================================================================================================

/// A single step of a programmable transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    /// Calls a Move entry or public function.
    MoveCall(Box<ProgrammableMoveCall>),
    /// Sends objects to the address given by the last argument.
    TransferObjects(Vec<Argument>, Argument),
    /// Splits the listed amounts off a coin, producing one new coin per amount.
    SplitCoins(Argument, Vec<Argument>),
    /// Merges the listed coins into the first argument.
    MergeCoins(Argument, Vec<Argument>),
    /// Publishes modules with the given dependencies.
    Publish(Vec<Vec<u8>>, Vec<ObjectId>),
    /// Builds a Move vector out of the arguments, optionally with an explicit element type.
    MakeMoveVec(Option<TypeTag>, Vec<Argument>),
    /// Upgrades `package` using the upgrade ticket in the last argument.
    Upgrade(Vec<Vec<u8>>, Vec<ObjectId>, ObjectId, Argument),
}

impl Serializable for Command {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        match self {
            Self::MoveCall(call) => target.write_variant(0, |t| t.write(call)),
            Self::TransferObjects(objects, recipient) => target.write_variant(1, |t| {
                t.write(objects)?;
                t.write(recipient)
            }),
            Self::SplitCoins(coin, amounts) => target.write_variant(2, |t| {
                t.write(coin)?;
                t.write(amounts)
            }),
            Self::MergeCoins(coin, sources) => target.write_variant(3, |t| {
                t.write(coin)?;
                t.write(sources)
            }),
            Self::Publish(modules, dependencies) => target.write_variant(4, |t| {
                t.write(modules)?;
                t.write(dependencies)
            }),
            Self::MakeMoveVec(element_type, elements) => target.write_variant(5, |t| {
                t.write(element_type)?;
                t.write(elements)
            }),
            Self::Upgrade(modules, dependencies, package, ticket) => {
                target.write_variant(6, |t| {
                    t.write(modules)?;
                    t.write(dependencies)?;
                    t.write(package)?;
                    t.write(ticket)
                })
            },
        }
    }
}

impl Deserializable for Command {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        source.read_variant(
            "Command",
            &[
                |source| Ok(Self::MoveCall(source.read()?)),
                |source| Ok(Self::TransferObjects(source.read()?, source.read()?)),
                |source| Ok(Self::SplitCoins(source.read()?, source.read()?)),
                |source| Ok(Self::MergeCoins(source.read()?, source.read()?)),
                |source| Ok(Self::Publish(source.read()?, source.read()?)),
                |source| Ok(Self::MakeMoveVec(source.read()?, source.read()?)),
                |source| {
                    Ok(Self::Upgrade(
                        source.read()?,
                        source.read()?,
                        source.read()?,
                        source.read()?,
                    ))
                },
            ],
        )
    }
}

// PROGRAMMABLE TRANSACTION
// ================================================================================================

/// A list of inputs and the commands consuming them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgrammableTransaction {
    pub inputs: Vec<CallArg>,
    pub commands: Vec<Command>,
}

impl Serializable for ProgrammableTransaction {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        target.write(&self.inputs)?;
        target.write(&self.commands)
    }
}

impl Deserializable for ProgrammableTransaction {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        Ok(Self {
            inputs: source.read()?,
            commands: source.read()?,
        })
    }

    fn min_serialized_size() -> usize {
        2
    }
}
