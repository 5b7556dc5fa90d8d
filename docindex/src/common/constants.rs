// record constants
pub const DOC_ID: &str = "_id";
pub const STORAGE_OPTION_SEPARATOR: char = ',';

// catalog constants
pub const ID_INDEX_NAME: &str = "_id_";
pub const INDEX_NAME_SEPARATOR: &str = "_";

// canonical key constants
pub const CANONICAL_KEY_SEPARATOR: char = '_';

// directive constants
pub const DIRECTIVE_TOKEN_SEPARATOR: char = ',';
pub const DIRECTIVE_GROUPSEQ: &str = "groupseq";
pub const DIRECTIVE_UNIQUE: &str = "unique";
pub const DIRECTIVE_GROUP: &str = "group";
pub const DIRECTIVE_SINGLE: &str = "single";

// a group whose name starts with this prefix produces a unique compound index
pub const UNIQUE_GROUP_PREFIX: &str = "unique";
