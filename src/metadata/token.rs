use std::fmt;
use std::hash::{Hash, Hasher};

/// A metadata token identifying a definition or reference row.
///
/// Tokens in .NET metadata consist of a 32-bit value where:
/// - The high byte (bits 24-31) indicates the table type
/// - The low 24 bits (bits 0-23) indicate the row index within that table
///
/// Definitions carry the token they were read with; references built in memory are given
/// fresh tokens by the [`crate::metadata::typesystem::TypeRegistry`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Token(pub u32);

impl Token {
    /// Table id of `TypeRef`
    pub const TYPE_REF: u8 = 0x01;
    /// Table id of `TypeDef`
    pub const TYPE_DEF: u8 = 0x02;
    /// Table id of `Field`
    pub const FIELD: u8 = 0x04;
    /// Table id of `MethodDef`
    pub const METHOD_DEF: u8 = 0x06;
    /// Table id of `Param`
    pub const PARAM: u8 = 0x08;
    /// Table id of `MemberRef`
    pub const MEMBER_REF: u8 = 0x0A;
    /// Table id of `Event`
    pub const EVENT: u8 = 0x14;
    /// Table id of `Property`
    pub const PROPERTY: u8 = 0x17;
    /// Table id of `TypeSpec`
    pub const TYPE_SPEC: u8 = 0x1B;
    /// Table id of `MethodSpec`
    pub const METHOD_SPEC: u8 = 0x2B;

    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Creates a token from a table id and a row index
    ///
    /// ## Arguments
    /// * 'table' - The table id (high byte)
    /// * 'row'   - The row index, truncated to 24 bits
    #[must_use]
    pub fn from_parts(table: u8, row: u32) -> Self {
        Token((u32::from(table) << 24) | (row & 0x00FF_FFFF))
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table type from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the row index from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns true if this is a null token (value 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if this token points into one of the definition tables
    #[must_use]
    pub fn is_definition(&self) -> bool {
        matches!(
            self.table(),
            Token::TYPE_DEF | Token::FIELD | Token::METHOD_DEF | Token::EVENT | Token::PROPERTY
        )
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}
