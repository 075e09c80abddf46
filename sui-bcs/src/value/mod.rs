//! Values decoded by walking a runtime description of their shape, for types that are not known
//! at compile time.

use alloc::{boxed::Box, string::String, vec::Vec};

use crate::{
    BudgetedReader, ByteReader, ByteWriter, DecoderConfig, DeserializationError, Deserializer,
    MAX_CONTAINER_DEPTH, Serializable, SerializationError, U256, sui::SuiAddress,
};


// LAYOUTS
// ================================================================================================

/// The shape of a BCS value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeLayout {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    Vector(Box<TypeLayout>),
    Struct(StructLayout),
    Enum(EnumLayout),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructLayout {
    pub name: String,
    pub fields: Vec<FieldLayout>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldLayout {
    pub name: String,
    pub layout: TypeLayout,
}

/// An enum whose variant index is the position in `variants`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumLayout {
    pub name: String,
    pub variants: Vec<VariantLayout>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariantLayout {
    pub name: String,
    pub fields: Vec<FieldLayout>,
}

impl FieldLayout {
    pub fn new(name: impl Into<String>, layout: TypeLayout) -> Self {
        Self { name: name.into(), layout }
    }
}

impl TypeLayout {
    pub fn vector(element: TypeLayout) -> Self {
        Self::Vector(Box::new(element))
    }

    pub fn structure(name: impl Into<String>, fields: Vec<FieldLayout>) -> Self {
        Self::Struct(StructLayout { name: name.into(), fields })
    }

    pub fn enumeration(name: impl Into<String>, variants: Vec<VariantLayout>) -> Self {
        Self::Enum(EnumLayout { name: name.into(), variants })
    }
}

// VALUE
// ================================================================================================

/// A decoded value. Struct and variant fields are kept in layout order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    U256(U256),
    Address(SuiAddress),
    Vector(Vec<Value>),
    Struct(Vec<Value>),
    Variant { index: u32, fields: Vec<Value> },
}

impl Value {
    /// Reads a value shaped like `layout` from `source`, allowing up to
    /// [MAX_CONTAINER_DEPTH] nested containers.
    pub fn read_with_layout<R: ByteReader>(
        source: &mut R,
        layout: &TypeLayout,
    ) -> Result<Self, DeserializationError> {
        Self::read_with_layout_and_depth(source, layout, MAX_CONTAINER_DEPTH)
    }

    /// Reads a value shaped like `layout`, failing with
    /// [DeserializationError::DepthLimitExceeded] when vectors, structs and enums nest more than
    /// `max_depth` levels deep.
    pub fn read_with_layout_and_depth<R: ByteReader>(
        source: &mut R,
        layout: &TypeLayout,
        max_depth: usize,
    ) -> Result<Self, DeserializationError> {
        LayoutReader { max_depth }.read(source, layout, 0)
    }

    /// Decodes all of `bytes` as a value shaped like `layout`, applying `config`.
    pub fn from_bytes_with_layout(
        bytes: &[u8],
        layout: &TypeLayout,
        config: &DecoderConfig,
    ) -> Result<Self, DeserializationError> {
        let reader = LayoutReader { max_depth: config.max_container_depth };
        let (value, remaining) = match config.budget {
            Some(budget) => {
                let mut source = BudgetedReader::new(Deserializer::new(bytes), budget);
                let value = reader.read(&mut source, layout, 0)?;
                (value, source.into_inner().remaining_bytes())
            },
            None => {
                let mut source = Deserializer::new(bytes);
                let value = reader.read(&mut source, layout, 0)?;
                (value, source.remaining_bytes())
            },
        };
        config.trailing_bytes.check(remaining)?;
        Ok(value)
    }
}

/// Walks a layout while tracking container depth.
#[derive(Debug, Clone, Copy)]
struct LayoutReader {
    max_depth: usize,
}

impl LayoutReader {
    fn read<R: ByteReader>(
        &self,
        source: &mut R,
        layout: &TypeLayout,
        depth: usize,
    ) -> Result<Value, DeserializationError> {
        let value = match layout {
            TypeLayout::Bool => Value::Bool(source.read_bool()?),
            TypeLayout::U8 => Value::U8(source.read_u8()?),
            TypeLayout::U16 => Value::U16(source.read_u16()?),
            TypeLayout::U32 => Value::U32(source.read_u32()?),
            TypeLayout::U64 => Value::U64(source.read_u64()?),
            TypeLayout::U128 => Value::U128(source.read_u128()?),
            TypeLayout::U256 => Value::U256(source.read()?),
            TypeLayout::Address => Value::Address(source.read()?),
            TypeLayout::Vector(element) => {
                let depth = self.enter(depth)?;
                Value::Vector(source.read_seq(|source| self.read(source, element, depth))?)
            },
            TypeLayout::Struct(layout) => {
                let depth = self.enter(depth)?;
                Value::Struct(self.read_fields(source, &layout.fields, depth)?)
            },
            TypeLayout::Enum(layout) => {
                let depth = self.enter(depth)?;
                let index = source.read_variant_index()?;
                let variant = usize::try_from(index)
                    .ok()
                    .and_then(|i| layout.variants.get(i))
                    .ok_or(DeserializationError::UnknownVariant {
                        type_name: "EnumLayout",
                        tag: index.into(),
                    })?;
                Value::Variant {
                    index,
                    fields: self.read_fields(source, &variant.fields, depth)?,
                }
            },
        };
        Ok(value)
    }

    fn read_fields<R: ByteReader>(
        &self,
        source: &mut R,
        fields: &[FieldLayout],
        depth: usize,
    ) -> Result<Vec<Value>, DeserializationError> {
        fields.iter().map(|field| self.read(source, &field.layout, depth)).collect()
    }

    fn enter(&self, depth: usize) -> Result<usize, DeserializationError> {
        if depth >= self.max_depth {
            return Err(DeserializationError::DepthLimitExceeded(self.max_depth));
        }
        Ok(depth + 1)
    }
}

impl Serializable for Value {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        match self {
            Self::Bool(value) => target.write_bool(*value),
            Self::U8(value) => target.write_u8(*value),
            Self::U16(value) => target.write_u16(*value),
            Self::U32(value) => target.write_u32(*value),
            Self::U64(value) => target.write_u64(*value),
            Self::U128(value) => target.write_u128(*value),
            Self::U256(value) => target.write(value)?,
            Self::Address(value) => target.write(value)?,
            Self::Vector(elements) => target.write_seq(elements, |t, element| t.write(element))?,
            Self::Struct(fields) => target.write_many(fields)?,
            Self::Variant { index, fields } => {
                target.write_variant(*index, |t| t.write_many(fields))?
            },
        }
        Ok(())
    }
}
