use alloc::{boxed::Box, string::String, vec::Vec};
use core::{fmt, str::FromStr};

use thiserror::Error;

use super::{AddressParseError, SuiAddress};
use crate::{
    ByteReader, ByteWriter, Deserializable, DeserializationError, MAX_CONTAINER_DEPTH, Serializable,
    SerializationError,
};

// IDENTIFIER
// ================================================================================================

/// Errors raised when parsing identifiers and type tags from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("identifier must not be empty")]
    Empty,
    #[error("invalid Move identifier `{0}`")]
    Invalid(String),
    #[error("invalid type tag `{0}`")]
    InvalidTypeTag(String),
    #[error("invalid address in type tag: {0}")]
    Address(#[from] AddressParseError),
}

/// A Move module, function or struct name.
///
/// Must match `[A-Za-z_][A-Za-z0-9_]*` and must not be a lone underscore.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Identifier(String);

impl Identifier {
    pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
        let value = value.into();
        if Self::is_valid(&value) {
            Ok(Self(value))
        } else if value.is_empty() {
            Err(IdentifierError::Empty)
        } else {
            Err(IdentifierError::Invalid(value))
        }
    }

    pub fn is_valid(value: &str) -> bool {
        let bytes = value.as_bytes();
        match bytes.first() {
            Some(b'_') if bytes.len() == 1 => false,
            Some(first) if first.is_ascii_alphabetic() || *first == b'_' => {
                bytes[1..].iter().all(|b| b.is_ascii_alphanumeric() || *b == b'_')
            },
            _ => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identifier> for String {
    fn from(identifier: Identifier) -> Self {
        identifier.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serializable for Identifier {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        self.0.write_into(target)
    }

    fn get_size_hint(&self) -> usize {
        self.0.get_size_hint()
    }
}

impl Deserializable for Identifier {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        let value = source.read_string()?;
        if !Self::is_valid(&value) {
            return Err(DeserializationError::malformed(format!("invalid identifier `{value}`")));
        }
        Ok(Self(value))
    }

    fn min_serialized_size() -> usize {
        2
    }
}

// TYPE TAG
// ================================================================================================

/// A fully instantiated Move type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeTag {
    Bool,
    U8,
    U64,
    U128,
    Address,
    Signer,
    Vector(Box<TypeTag>),
    Struct(Box<StructTag>),
    U16,
    U32,
    U256,
}

/// A Move struct type such as `0x2::coin::Coin<0x2::sui::SUI>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StructTag {
    pub address: SuiAddress,
    pub module: Identifier,
    pub name: Identifier,
    pub type_params: Vec<TypeTag>,
}

impl TypeTag {
    fn discriminant(&self) -> u32 {
        match self {
            Self::Bool => 0,
            Self::U8 => 1,
            Self::U64 => 2,
            Self::U128 => 3,
            Self::Address => 4,
            Self::Signer => 5,
            Self::Vector(_) => 6,
            Self::Struct(_) => 7,
            Self::U16 => 8,
            Self::U32 => 9,
            Self::U256 => 10,
        }
    }
}

impl Serializable for TypeTag {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        target.write_variant(self.discriminant(), |target| match self {
            Self::Vector(inner) => inner.write_into(target),
            Self::Struct(tag) => tag.write_into(target),
            _ => Ok(()),
        })
    }
}

impl Deserializable for TypeTag {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        read_type_tag(source, 0)
    }
}

/// Reads a type tag nested `depth` levels inside another one.
fn read_type_tag<R: ByteReader>(
    source: &mut R,
    depth: usize,
) -> Result<TypeTag, DeserializationError> {
    if depth > MAX_CONTAINER_DEPTH {
        return Err(DeserializationError::DepthLimitExceeded(MAX_CONTAINER_DEPTH));
    }
    let tag = match source.read_variant_index()? {
        0 => TypeTag::Bool,
        1 => TypeTag::U8,
        2 => TypeTag::U64,
        3 => TypeTag::U128,
        4 => TypeTag::Address,
        5 => TypeTag::Signer,
        6 => TypeTag::Vector(Box::new(read_type_tag(source, depth + 1)?)),
        7 => TypeTag::Struct(Box::new(read_struct_tag(source, depth + 1)?)),
        8 => TypeTag::U16,
        9 => TypeTag::U32,
        10 => TypeTag::U256,
        tag => {
            return Err(DeserializationError::UnknownVariant {
                type_name: "TypeTag",
                tag: u64::from(tag),
            });
        },
    };
    Ok(tag)
}

fn read_struct_tag<R: ByteReader>(
    source: &mut R,
    depth: usize,
) -> Result<StructTag, DeserializationError> {
    Ok(StructTag {
        address: source.read()?,
        module: source.read()?,
        name: source.read()?,
        type_params: source.read_seq(|source| read_type_tag(source, depth + 1))?,
    })
}

impl Serializable for StructTag {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        self.address.write_into(target)?;
        self.module.write_into(target)?;
        self.name.write_into(target)?;
        self.type_params.write_into(target)
    }
}

impl Deserializable for StructTag {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        read_struct_tag(source, 0)
    }

    fn min_serialized_size() -> usize {
        SuiAddress::min_serialized_size() + 2 * Identifier::min_serialized_size() + 1
    }
}

// TEXT FORMAT
// ------------------------------------------------------------------------------------------------

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::U8 => f.write_str("u8"),
            Self::U16 => f.write_str("u16"),
            Self::U32 => f.write_str("u32"),
            Self::U64 => f.write_str("u64"),
            Self::U128 => f.write_str("u128"),
            Self::U256 => f.write_str("u256"),
            Self::Address => f.write_str("address"),
            Self::Signer => f.write_str("signer"),
            Self::Vector(inner) => write!(f, "vector<{inner}>"),
            Self::Struct(tag) => write!(f, "{tag}"),
        }
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.address, self.module, self.name)?;
        if let Some((first, rest)) = self.type_params.split_first() {
            write!(f, "<{first}")?;
            for param in rest {
                write!(f, ", {param}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl FromStr for TypeTag {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = TypeTagParser { input: s, pos: 0 };
        let tag = parser.parse_type_tag(0)?;
        parser.skip_whitespace();
        if parser.pos != s.len() {
            return Err(IdentifierError::InvalidTypeTag(s.into()));
        }
        Ok(tag)
    }
}

impl FromStr for StructTag {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<TypeTag>()? {
            TypeTag::Struct(tag) => Ok(*tag),
            _ => Err(IdentifierError::InvalidTypeTag(s.into())),
        }
    }
}

/// Recursive-descent parser for the `0x2::coin::Coin<0x2::sui::SUI>` text form.
struct TypeTagParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> TypeTagParser<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_whitespace();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> Result<(), IdentifierError> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error())
        }
    }

    fn error(&self) -> IdentifierError {
        IdentifierError::InvalidTypeTag(self.input.into())
    }

    /// Returns the next run of `[A-Za-z0-9_]` characters.
    fn word(&mut self) -> &'a str {
        self.skip_whitespace();
        let rest = self.rest();
        let end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    /// Parses a type tag nested `depth` levels inside another one.
    fn parse_type_tag(&mut self, depth: usize) -> Result<TypeTag, IdentifierError> {
        if depth > MAX_CONTAINER_DEPTH {
            return Err(self.error());
        }
        let word = self.word();
        let tag = match word {
            "bool" => TypeTag::Bool,
            "u8" => TypeTag::U8,
            "u16" => TypeTag::U16,
            "u32" => TypeTag::U32,
            "u64" => TypeTag::U64,
            "u128" => TypeTag::U128,
            "u256" => TypeTag::U256,
            "address" => TypeTag::Address,
            "signer" => TypeTag::Signer,
            "vector" => {
                self.expect("<")?;
                let inner = self.parse_type_tag(depth + 1)?;
                self.expect(">")?;
                TypeTag::Vector(Box::new(inner))
            },
            "" => return Err(self.error()),
            address => TypeTag::Struct(Box::new(self.parse_struct_tail(address, depth + 1)?)),
        };
        Ok(tag)
    }

    fn parse_struct_tail(
        &mut self,
        address: &str,
        depth: usize,
    ) -> Result<StructTag, IdentifierError> {
        let address = address.parse::<SuiAddress>()?;
        self.expect("::")?;
        let module = Identifier::new(self.word())?;
        self.expect("::")?;
        let name = Identifier::new(self.word())?;

        let mut type_params = Vec::new();
        if self.eat("<") {
            loop {
                type_params.push(self.parse_type_tag(depth + 1)?);
                if self.eat(">") {
                    break;
                }
                self.expect(",")?;
            }
        }
        Ok(StructTag { address, module, name, type_params })
    }
}
