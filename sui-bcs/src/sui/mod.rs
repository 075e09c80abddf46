//! Sui protocol types that travel inside programmable transactions.

mod address;
pub use address::{
    ADDRESS_LENGTH, AddressParseError, ObjectDigest, ObjectId, ObjectRef, SequenceNumber,
    SuiAddress,
};

mod argument;
pub use argument::{
    Argument, ArgumentKind, Bool, CallArg, ObjectArg, ObjectArgument, ObjectArgumentType,
    TransactionObjectArgument,
};

mod builder;
pub use builder::{BuilderError, ProgrammableTransactionBuilder};

mod transaction;
pub use transaction::{Command, ProgrammableMoveCall, ProgrammableTransaction};

mod type_tag;
pub use type_tag::{Identifier, IdentifierError, StructTag, TypeTag};


// CONSTANTS
// ================================================================================================

/// Package of the Move standard library.
pub const MOVE_STDLIB_PACKAGE_ID: ObjectId = SuiAddress::from_u8(0x1);

/// Package of the Sui framework (`0x2::coin`, `0x2::transfer`, ...).
pub const SUI_FRAMEWORK_PACKAGE_ID: ObjectId = SuiAddress::from_u8(0x2);

/// Package of the Sui system modules, including staking.
pub const SUI_SYSTEM_PACKAGE_ID: ObjectId = SuiAddress::from_u8(0x3);

/// The shared object holding the Sui system state.
pub const SUI_SYSTEM_STATE_OBJECT_ID: ObjectId = SuiAddress::from_u8(0x5);

/// Version at which the system state object became shared.
pub const SUI_SYSTEM_STATE_OBJECT_SHARED_VERSION: SequenceNumber = SequenceNumber(1);

/// Returns the object argument for the Sui system state.
pub const fn sui_system_state_object(mutable: bool) -> ObjectArg {
    ObjectArg::SharedObject {
        id: SUI_SYSTEM_STATE_OBJECT_ID,
        initial_shared_version: SUI_SYSTEM_STATE_OBJECT_SHARED_VERSION,
        mutable,
    }
}
