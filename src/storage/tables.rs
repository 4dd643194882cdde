/// Users: array of User
pub const USERS: &str = "users.json";

/// Session tokens: array of SessionToken (hashed secrets only)
pub const TOKENS: &str = "tokens.json";

/// Tools: array of Tool
pub const TOOLS: &str = "tools.json";

/// ID bands: keyword -> highest band issued for that keyword
pub const ID_LOOKUP: &str = "id_lookup.json";
