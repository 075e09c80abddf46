use alloc::{boxed::Box, collections::BTreeMap, vec::Vec};

use thiserror::Error;

use super::{
    Argument, CallArg, Command, Identifier, IdentifierError, ObjectArg, ObjectArgument, ObjectId,
    ProgrammableMoveCall, ProgrammableTransaction, SUI_SYSTEM_PACKAGE_ID, SuiAddress, TypeTag,
};
use crate::{Serializable, SerializationError};

// BUILDER ERROR
// ================================================================================================

/// Errors raised while assembling a programmable transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    #[error("transaction cannot have more than {} inputs", u16::MAX as usize + 1)]
    TooManyInputs,
    #[error("transaction cannot have more than {} commands", u16::MAX as usize + 1)]
    TooManyCommands,
    #[error("object {id} is used as an input in incompatible ways")]
    ConflictingObjectInput { id: ObjectId },
    #[error("failed to serialize pure input")]
    Serialization(#[from] SerializationError),
    #[error(transparent)]
    Identifier(#[from] IdentifierError),
}

// PROGRAMMABLE TRANSACTION BUILDER
// ================================================================================================

/// Incrementally builds a [ProgrammableTransaction].
///
/// Inputs are deduplicated: pure values with identical bytes and objects with the same id always
/// map to the same [Argument::Input].
#[derive(Debug, Default, Clone)]
pub struct ProgrammableTransactionBuilder {
    inputs: Vec<CallArg>,
    pure_inputs: BTreeMap<Vec<u8>, u16>,
    object_inputs: BTreeMap<ObjectId, u16>,
    commands: Vec<Command>,
}

impl ProgrammableTransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // INPUTS
    // --------------------------------------------------------------------------------------------

    /// Adds the BCS encoding of `value` as a pure input.
    pub fn pure<T: Serializable + ?Sized>(&mut self, value: &T) -> Result<Argument, BuilderError> {
        self.pure_bytes(value.to_bytes()?)
    }

    /// Adds already encoded bytes as a pure input.
    pub fn pure_bytes(&mut self, bytes: Vec<u8>) -> Result<Argument, BuilderError> {
        if let Some(&index) = self.pure_inputs.get(&bytes) {
            return Ok(Argument::Input(index));
        }
        let index = self.push_input(CallArg::Pure(bytes.clone()))?;
        self.pure_inputs.insert(bytes, index);
        Ok(Argument::Input(index))
    }

    /// Adds an object input.
    ///
    /// Using the same shared object twice yields one input which is mutable if any use was.
    ///
    /// # Errors
    /// Returns [BuilderError::ConflictingObjectInput] if the object was already added with a
    /// different reference or ownership.
    pub fn obj(&mut self, object: ObjectArg) -> Result<Argument, BuilderError> {
        let id = object.id();
        let Some(&index) = self.object_inputs.get(&id) else {
            let index = self.push_input(CallArg::Object(object))?;
            self.object_inputs.insert(id, index);
            return Ok(Argument::Input(index));
        };

        match self.inputs.get_mut(usize::from(index)) {
            Some(CallArg::Object(existing)) => {
                *existing = merge_object_inputs(*existing, object)?;
                Ok(Argument::Input(index))
            },
            _ => Err(BuilderError::ConflictingObjectInput { id }),
        }
    }

    /// Resolves any object argument into an [Argument], registering it as an input if needed.
    pub fn object_argument(&mut self, object: ObjectArgument) -> Result<Argument, BuilderError> {
        match object {
            ObjectArgument::Call(object) => self.obj(object),
            ObjectArgument::Transaction(object) => Ok(object.argument),
        }
    }

    fn push_input(&mut self, input: CallArg) -> Result<u16, BuilderError> {
        let index = u16::try_from(self.inputs.len()).map_err(|_| BuilderError::TooManyInputs)?;
        tracing::trace!(index, "adding transaction input");
        self.inputs.push(input);
        Ok(index)
    }

    // COMMANDS
    // --------------------------------------------------------------------------------------------

    /// Appends `command` and returns the argument referring to its result.
    pub fn command(&mut self, command: Command) -> Result<Argument, BuilderError> {
        let index =
            u16::try_from(self.commands.len()).map_err(|_| BuilderError::TooManyCommands)?;
        tracing::trace!(index, ?command, "adding transaction command");
        self.commands.push(command);
        Ok(Argument::Result(index))
    }

    pub fn move_call(
        &mut self,
        package: ObjectId,
        module: Identifier,
        function: Identifier,
        type_arguments: Vec<TypeTag>,
        arguments: Vec<Argument>,
    ) -> Result<Argument, BuilderError> {
        self.command(Command::MoveCall(Box::new(ProgrammableMoveCall {
            package,
            module,
            function,
            type_arguments,
            arguments,
        })))
    }

    /// Sends `objects` to `recipient`.
    pub fn transfer_objects(
        &mut self,
        recipient: SuiAddress,
        objects: Vec<Argument>,
    ) -> Result<Argument, BuilderError> {
        let recipient = self.pure(&recipient)?;
        self.command(Command::TransferObjects(objects, recipient))
    }

    /// Splits one new coin per entry of `amounts` off `coin`.
    ///
    /// The `i`-th new coin is `NestedResult(command, i)` of the returned `Result(command)`.
    pub fn split_coins(
        &mut self,
        coin: Argument,
        amounts: &[u64],
    ) -> Result<Argument, BuilderError> {
        let amounts = amounts
            .iter()
            .map(|amount| self.pure(amount))
            .collect::<Result<Vec<_>, _>>()?;
        self.command(Command::SplitCoins(coin, amounts))
    }

    pub fn merge_coins(
        &mut self,
        coin: Argument,
        sources: Vec<Argument>,
    ) -> Result<Argument, BuilderError> {
        self.command(Command::MergeCoins(coin, sources))
    }

    /// Stakes `amount` MIST taken from `coin` with `validator`.
    ///
    /// Splits the amount off `coin` and passes the new coin to
    /// `0x3::sui_system::request_add_stake`.
    pub fn stake_request(
        &mut self,
        system_state: ObjectArg,
        coin: Argument,
        amount: u64,
        validator: SuiAddress,
    ) -> Result<Argument, BuilderError> {
        let system_state = self.obj(system_state)?;
        let stake = match self.split_coins(coin, &[amount])? {
            Argument::Result(index) => Argument::NestedResult(index, 0),
            other => other,
        };
        let validator = self.pure(&validator)?;
        self.move_call(
            SUI_SYSTEM_PACKAGE_ID,
            Identifier::new("sui_system")?,
            Identifier::new("request_add_stake")?,
            Vec::new(),
            vec![system_state, stake, validator],
        )
    }

    // FINALIZATION
    // --------------------------------------------------------------------------------------------

    pub fn finish(self) -> ProgrammableTransaction {
        ProgrammableTransaction {
            inputs: self.inputs,
            commands: self.commands,
        }
    }
}

/// Combines two uses of the same object into a single input.
fn merge_object_inputs(existing: ObjectArg, new: ObjectArg) -> Result<ObjectArg, BuilderError> {
    match (existing, new) {
        (
            ObjectArg::SharedObject { id, initial_shared_version, mutable },
            ObjectArg::SharedObject {
                initial_shared_version: other_version,
                mutable: other_mutable,
                ..
            },
        ) if initial_shared_version == other_version => Ok(ObjectArg::SharedObject {
            id,
            initial_shared_version,
            mutable: mutable || other_mutable,
        }),
        (existing, new) if existing == new => Ok(existing),
        (existing, _) => Err(BuilderError::ConflictingObjectInput { id: existing.id() }),
    }
}
