use bincode::de::Decoder;
use bincode::error::{AllowedEnumVariants, DecodeError};
use bincode::{Decode, Encode};
use derive_more::{From, Into};
use strum::{AsRefStr, Display};

use crate::names::NameTable;

/// Structural description of a single declaration.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct ClassMetadata {
    /// Index into the qualified-name table.
    pub name: u32,
    pub kind: ClassKind,
    pub flags: ClassFlags,
    /// Constructors in declaration order.
    pub constructors: Vec<Constructor>,
    pub names: NameTable,
}

impl ClassMetadata {
    /// The constructor flagged as primary, falling back to the first one
    /// listed since hosts list the primary constructor first.
    pub fn primary_constructor(&self) -> Option<&Constructor> {
        self.constructors
            .iter()
            .find(|c| c.is_primary)
            .or_else(|| self.constructors.first())
    }

    /// A value-like aggregate whose identity is its fields.
    pub fn is_product(&self) -> bool {
        self.flags.contains(ClassFlags::PRODUCT) && self.kind.is_aggregate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ClassKind {
    Struct,
    TupleStruct,
    UnitStruct,
    Enum,
    Union,
    Trait,
    Object,
}

impl ClassKind {
    pub fn is_aggregate(&self) -> bool {
        matches!(
            self,
            ClassKind::Struct | ClassKind::TupleStruct | ClassKind::UnitStruct
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Encode, Decode, From, Into)]
pub struct ClassFlags(pub u32);

impl ClassFlags {
    pub const EMPTY: ClassFlags = ClassFlags(0);
    /// Declared as a value/record aggregate.
    pub const PRODUCT: ClassFlags = ClassFlags(1 << 0);
    /// Produced by another generator.
    pub const GENERATED: ClassFlags = ClassFlags(1 << 1);
    pub const NON_EXHAUSTIVE: ClassFlags = ClassFlags(1 << 2);

    pub fn contains(&self, other: ClassFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn with(self, other: ClassFlags) -> ClassFlags {
        ClassFlags(self.0 | other.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Encode, Decode)]
pub struct Constructor {
    pub is_primary: bool,
    pub value_parameters: Vec<ValueParameter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct ValueParameter {
    /// Index into the string table.
    pub name: u32,
    pub ty: TypeRef,
}

/// Deepest nesting of type references accepted when decoding or rendering.
pub const MAX_TYPE_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Encode)]
pub enum TypeRef {
    Class {
        /// Index into the qualified-name table.
        name: u32,
        arguments: Vec<TypeRef>,
        nullable: bool,
    },
    /// Generic parameter, named through the string table.
    Parameter { name: u32 },
    Tuple(Vec<TypeRef>),
    Array { element: Box<TypeRef>, len: u64 },
}

impl TypeRef {
    pub fn class(name: u32) -> TypeRef {
        TypeRef::Class {
            name,
            arguments: Vec::new(),
            nullable: false,
        }
    }

    /// First generic parameter mentioned anywhere in this type.
    pub fn find_parameter(&self) -> Option<u32> {
        match self {
            TypeRef::Class { arguments, .. } | TypeRef::Tuple(arguments) => {
                arguments.iter().find_map(TypeRef::find_parameter)
            }
            TypeRef::Parameter { name } => Some(*name),
            TypeRef::Array { element, .. } => element.find_parameter(),
        }
    }

    fn decode_at<D: Decoder>(decoder: &mut D, depth: usize) -> Result<Self, DecodeError> {
        if depth >= MAX_TYPE_DEPTH {
            return Err(DecodeError::Other("type reference nested too deeply"));
        }
        let variant_index = u32::decode(decoder)?;
        match variant_index {
            0 => Ok(TypeRef::Class {
                name: u32::decode(decoder)?,
                arguments: decode_list(decoder, depth + 1)?,
                nullable: bool::decode(decoder)?,
            }),
            1 => Ok(TypeRef::Parameter {
                name: u32::decode(decoder)?,
            }),
            2 => Ok(TypeRef::Tuple(decode_list(decoder, depth + 1)?)),
            3 => Ok(TypeRef::Array {
                element: Box::new(TypeRef::decode_at(decoder, depth + 1)?),
                len: u64::decode(decoder)?,
            }),
            found => Err(DecodeError::UnexpectedVariant {
                type_name: "TypeRef",
                allowed: &AllowedEnumVariants::Range { min: 0, max: 3 },
                found,
            }),
        }
    }
}

// Decoded by hand so that nesting depth is bounded.
impl<Context> Decode<Context> for TypeRef {
    fn decode<D: Decoder<Context = Context>>(decoder: &mut D) -> Result<Self, DecodeError> {
        TypeRef::decode_at(decoder, 0)
    }
}

bincode::impl_borrow_decode!(TypeRef);

fn decode_list<D: Decoder>(decoder: &mut D, depth: usize) -> Result<Vec<TypeRef>, DecodeError> {
    let len = u64::decode(decoder)?;
    let len = usize::try_from(len).map_err(|_| DecodeError::OutsideUsizeRange(len))?;
    decoder.claim_container_read::<TypeRef>(len)?;

    let mut list = Vec::with_capacity(len);
    for _ in 0..len {
        decoder.unclaim_bytes_read(core::mem::size_of::<TypeRef>());
        list.push(TypeRef::decode_at(decoder, depth)?);
    }
    Ok(list)
}
