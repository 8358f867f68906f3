#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("parameter {path} is defined by both {first} and {second}")]
    DuplicatePath {
        path: String,
        first: String,
        second: String,
    },

    #[error("columns {first_column:?} and {second_column:?} of table {table} both map to {path}")]
    SlugCollision {
        table: String,
        path: String,
        first_column: String,
        second_column: String,
    },

    #[error("{path} is both a parameter and a group of parameters (table {table})")]
    ShapeConflict { path: String, table: String },
}
