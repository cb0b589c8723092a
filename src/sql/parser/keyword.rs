use strum::{EnumString, IntoStaticStr};

/// Keywords of the command language.
///
/// Matching is exact: keywords are only recognized in upper case. The
/// `&'static str` form is the keyword as written, which lets a keyword stand
/// in as a table or column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Keyword {
    Create,
    Table,
    Add,
    Column,

    Select,
    Insert,
    Update,
    Delete,
    Where,
    From,
    Into,
    Values,
    Set,
    And,

    Save,
    Load,
    To,
}
