use crate::descriptor::DeclarationDescriptor;
use crate::error::ValidationError;

/// Ceiling on constructor parameters, matching the largest tuple the
/// runtime's `Product` trait supports.
pub const MAX_ARITY: usize = prodgen_runtime::MAX_ARITY;

/// Checks the shape constraints an extracted descriptor must meet before it
/// is recorded. A declaration with no fields is valid.
pub fn validate<H>(
    descriptor: DeclarationDescriptor<H>,
) -> Result<DeclarationDescriptor<H>, ValidationError> {
    if descriptor.arity() > MAX_ARITY {
        return Err(ValidationError::TooManyFields {
            name: descriptor.qualified_name().to_string(),
            actual: descriptor.arity(),
            max: MAX_ARITY,
        });
    }
    Ok(descriptor)
}
