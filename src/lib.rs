/*

lindenmayer_rs: grow strings with L-system productions, then walk
them with a turtle to get a graph of 2D points and directed edges.

Nothing in here draws anything. The graph is meant to be handed to
whatever renderer the caller has.

 */

//////////////////////////////////////////////////////////////////////
// use error chain so the configuration layer can use Result<>
// everywhere; the engine and turtle themselves never fail

#[macro_use]
extern crate error_chain;

#[macro_use]
extern crate log;

pub mod errors {

    error_chain!{

        foreign_links {
            Io(::std::io::Error);
        }

        errors {

            UnknownPreset(name: String) {
                description("unknown preset")
                display("unknown preset: \"{:}\", expected one of: {:}",
                        name, crate::library::preset_names().join(", "))
            }

            ExpansionTooLong(limit: usize, actual: usize) {
                description("expansion exceeds length limit")
                display("expansion would produce {:} symbols (limit is {:})", actual, limit)
            }

        }

    }

}

pub mod geom;
pub mod lsystem;
pub mod turtle;
pub mod library;
pub mod grammar;

pub use errors::{Error, ErrorKind, Result, ResultExt};
pub use geom::{Graph, NodeKey, Point2d, Rect2d, Vec2d, YFlip, deg_to_rad, fit_transform};
pub use lsystem::{LSystem, RuleSet};
pub use turtle::{Command, RunStats, Turtle, TurtleConfig};
pub use library::{Preset, preset, preset_names, PRESETS};
pub use grammar::GrammarSpec;

#[cfg(test)]
pub(crate) fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
