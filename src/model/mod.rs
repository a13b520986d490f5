//! The domain model: namespaces, the descriptor input contract, the
//! declaration graph, and its text serialization.

pub mod declaration;
pub mod descriptor;
pub mod namespace;
pub mod text;
