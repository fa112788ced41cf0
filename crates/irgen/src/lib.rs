//! simpl IR generator: syntax tree to three-address code.
//!
//! Generation assumes a well-formed tree and cannot fail. Programs that
//! were not checked by [`simpl_frontend::analyze`] still lower; any type
//! errors they contain surface when the VM runs them.

pub mod generator;

pub use generator::Generator;

use simpl_common::Program;
use simpl_frontend::ast::Block;
use tracing::debug;

/// Lower `program` with a fresh [`Generator`].
pub fn generate(program: &Block) -> Program {
    let program = Generator::new().generate(program);
    debug!(instructions = program.len(), "generated IR");
    program
}
