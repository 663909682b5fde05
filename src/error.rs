use thiserror::Error;

macro_rules! invalid_argument {
    // Single string version
    ($msg:expr) => {
        crate::Error::InvalidArgument($msg.to_string())
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::InvalidArgument(format!($fmt, $($arg)*))
    };
}

macro_rules! not_supported {
    ($msg:expr) => {
        crate::Error::NotSupported($msg.to_string())
    };

    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::NotSupported(format!($fmt, $($arg)*))
    };
}

pub(crate) use invalid_argument;
pub(crate) use not_supported;

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The variants fall into groups that callers usually treat differently:
///
/// ## Argument errors
/// - [`Error::InvalidArgument`] - The caller passed a value the operation cannot work with, e.g.
///   a non-interface type to the interface mapper, or a generic instance whose argument count
///   does not match the arity of its element
///
/// ## Unsupported operations
/// - [`Error::NotSupported`] - Attempt to mutate a derived or delegated property of a
///   specification or constructed wrapper, or to resolve a reference that has no owning scope
///
/// ## Resolution errors
/// - [`Error::TypeNotFound`] - A type reference could not be resolved to a definition
/// - [`Error::MemberNotFound`] - A member reference could not be resolved to a definition
///
/// ## Structural errors
/// - [`Error::RecursionLimit`] - Maximum base type depth exceeded (cyclic or malformed input)
/// - [`Error::LockError`] - Thread synchronization failure while mutating a member
///
/// # Examples
///
/// ```rust
/// use cilgraph::{Error, metadata::typesystem::{TypeBuilder, TypeNode}};
///
/// let list = TypeBuilder::class("System.Collections.Generic", "List`1")
///     .generic_parameters(["T"])
///     .build();
///
/// match TypeNode::generic_instance(&list, vec![]) {
///     Ok(_) => println!("constructed"),
///     Err(Error::InvalidArgument(message)) => eprintln!("bad arguments: {}", message),
///     Err(e) => eprintln!("other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The caller passed an unusable value.
    ///
    /// Argument errors are deterministic functions of the input graph; retrying the same call
    /// will fail the same way.
    #[error("Invalid argument - {0}")]
    InvalidArgument(String),

    /// The requested operation is not supported on this item.
    ///
    /// Raised when a derived or delegated property of a specification or constructed wrapper is
    /// written to, or when a reference without an owning scope is resolved.
    #[error("Operation not supported - {0}")]
    NotSupported(String),

    /// Failed to resolve a type reference to its definition.
    ///
    /// The associated value is the full name of the reference that was looked up.
    #[error("Failed to resolve type - {0}")]
    TypeNotFound(String),

    /// Failed to resolve a member reference to its definition.
    ///
    /// The associated value is the full name of the reference that was looked up.
    #[error("Failed to resolve member - {0}")]
    MemberNotFound(String),

    /// Recursion limit reached.
    ///
    /// Base type chains are walked recursively; a chain longer than the configured limit
    /// indicates a cyclic hierarchy.
    ///
    /// The associated value shows the recursion limit that was reached.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// Failed to lock target.
    #[error("Failed to lock target")]
    LockError,
}
