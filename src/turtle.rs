//////////////////////////////////////////////////////////////////////
// turtle interpreter: walk a command string and record every forward
// step as an edge in a Graph

use crate::geom::{Graph, Point2d, Vec2d, NODE_TOLERANCE};

use phf::phf_map;

const PI: f64 = std::f64::consts::PI;

//////////////////////////////////////////////////////////////////////
// the drawing commands and the symbols that trigger them

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Command {
    Forward,   // step along heading, recording an edge
    TurnRight, // heading -= turn angle
    TurnLeft,  // heading += turn angle
    Push,      // save (position, heading)
    Pop,       // restore last saved (position, heading)
    ScaleUp,   // length *= length factor
    ScaleDown  // length /= length factor
}

// define a lookup table matching symbols to commands; anything
// missing from here is a grammar-only symbol the turtle skips
static SYMBOL_LOOKUP: phf::Map<char, Command> = phf_map! {
    'F' => Command::Forward,
    '+' => Command::TurnRight,
    '-' => Command::TurnLeft,
    '[' => Command::Push,
    ']' => Command::Pop,
    '>' => Command::ScaleUp,
    '<' => Command::ScaleDown,
};

impl Command {

    pub fn from_symbol(symbol: char) -> Option<Command> {
        SYMBOL_LOOKUP.get(&symbol).cloned()
    }

    pub fn symbol(self) -> char {
        match self {
            Command::Forward => 'F',
            Command::TurnRight => '+',
            Command::TurnLeft => '-',
            Command::Push => '[',
            Command::Pop => ']',
            Command::ScaleUp => '>',
            Command::ScaleDown => '<'
        }
    }

}

//////////////////////////////////////////////////////////////////////
// drawing parameters; angles are in radians

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct TurtleConfig {
    pub initial_length:  f64,     // step length at the start of a run
    pub initial_pos:     Point2d, // where the first step starts
    pub initial_heading: f64,     // 0 = +x, pi/2 = +y
    pub turn_angle:      f64,     // increment for + and -
    pub length_factor:   f64      // multiplier for > and divisor for <
}

impl Default for TurtleConfig {
    fn default() -> Self {
        TurtleConfig {
            initial_length: 1.0,
            initial_pos: Point2d::origin(),
            initial_heading: 0.5*PI,
            turn_angle: 0.0,
            length_factor: 1.0
        }
    }
}

impl TurtleConfig {

    pub fn new(initial_length: f64,
               initial_pos: Point2d,
               initial_heading: f64,
               turn_angle: f64,
               length_factor: f64) -> Self {

        TurtleConfig {
            initial_length,
            initial_pos,
            initial_heading,
            turn_angle,
            length_factor
        }

    }

}

//////////////////////////////////////////////////////////////////////
// counters from the most recent run

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct RunStats {
    pub forward_steps:  usize, // edges recorded
    pub max_depth:      usize, // deepest the branch stack got
    pub unmatched_pops: usize  // pops ignored because the stack was empty
}

//////////////////////////////////////////////////////////////////////
// mutable cursor, rebuilt from the config at the start of every run

#[derive(Debug, PartialEq, Clone, Copy)]
struct Cursor {
    pos:     Point2d,
    heading: f64,
    length:  f64
}

impl Cursor {

    fn from_config(config: &TurtleConfig) -> Self {
        Cursor {
            pos: config.initial_pos,
            heading: config.initial_heading,
            length: config.initial_length
        }
    }

    fn destination(&self) -> Point2d {
        self.pos + self.length * Vec2d::new(self.heading.cos(), self.heading.sin())
    }

}

//////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone)]
pub struct Turtle {

    config: TurtleConfig,

    // keeping track of traversal
    cursor: Cursor,
    stack:  Vec<(Point2d, f64)>,

    // output
    graph:  Graph,
    root:   Option<Point2d>,
    stats:  RunStats

}

impl Default for Turtle {
    fn default() -> Self {
        Turtle::new(Default::default())
    }
}

impl Turtle {

    pub fn new(config: TurtleConfig) -> Self {
        Turtle {
            config,
            cursor: Cursor::from_config(&config),
            stack: Vec::new(),
            graph: Graph::new(),
            root: None,
            stats: Default::default()
        }
    }

    pub fn config(&self) -> &TurtleConfig {
        &self.config
    }

    // swap in new parameters; also discards the previous run's output
    pub fn reconfigure(&mut self, config: TurtleConfig) {
        self.config = config;
        self.reset();
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn root(&self) -> Option<Point2d> {
        self.root
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    pub fn edge_list(&self) -> Vec<(Point2d, Point2d)> {
        self.graph.edge_list()
    }

    // put everything back the way the config says, drop all output
    fn reset(&mut self) {
        self.cursor = Cursor::from_config(&self.config);
        self.stack.clear();
        self.graph.clear();
        self.root = None;
        self.stats = Default::default();
    }

    /// Walk `commands` from the configured start state, rebuilding the
    /// graph and root from scratch.
    ///
    /// Symbols are consumed left to right with no lookahead. Symbols
    /// without a [`Command`] are skipped, and a `]` with nothing to
    /// restore is ignored, so this never fails.
    pub fn run(&mut self, commands: &str) {

        self.reset();

        let quantum = self.node_quantum(commands);
        self.graph.reset(quantum);

        for c in commands.chars() {
            if let Some(cmd) = Command::from_symbol(c) {
                self.execute(cmd);
            }
        }

        debug!("turtle: {:} symbols -> {:} nodes, {:} edges, max depth {:}, {:} unmatched pops",
               commands.len(), self.graph.node_count(), self.graph.edge_count(),
               self.stats.max_depth, self.stats.unmatched_pops);

    }

    // node grid spacing for a walk: a fixed fraction of the shortest
    // step it will take, so that scaled-down or tiny steps still land
    // on distinct nodes. zero means exact identity.
    fn node_quantum(&self, commands: &str) -> f64 {

        let mut length = self.config.initial_length;
        let mut shortest = f64::INFINITY;

        for c in commands.chars() {
            match Command::from_symbol(c) {
                Some(Command::Forward) => {
                    let l = length.abs();
                    if l > 0.0 && l < shortest {
                        shortest = l;
                    }
                }
                Some(Command::ScaleUp) => length *= self.config.length_factor,
                Some(Command::ScaleDown) => length /= self.config.length_factor,
                _ => {}
            }
        }

        if shortest.is_finite() {
            NODE_TOLERANCE * shortest
        } else {
            0.0
        }

    }

    fn execute(&mut self, cmd: Command) {

        match cmd {

            Command::Forward => {
                self.forward();
            }

            Command::TurnRight => {
                self.cursor.heading -= self.config.turn_angle;
            }

            Command::TurnLeft => {
                self.cursor.heading += self.config.turn_angle;
            }

            Command::Push => {
                self.stack.push((self.cursor.pos, self.cursor.heading));
                self.stats.max_depth = self.stats.max_depth.max(self.stack.len());
            }

            Command::Pop => {
                match self.stack.pop() {
                    Some((pos, heading)) => {
                        self.cursor.pos = pos;
                        self.cursor.heading = heading;
                    }
                    None => {
                        trace!("turtle: pop with empty branch stack ignored");
                        self.stats.unmatched_pops += 1;
                    }
                }
            }

            Command::ScaleUp => {
                self.cursor.length *= self.config.length_factor;
            }

            Command::ScaleDown => {
                self.cursor.length /= self.config.length_factor;
            }

        }

    }

    fn forward(&mut self) {

        let source = self.cursor.pos;
        let destination = self.cursor.destination();

        if self.root.is_none() {
            self.root = Some(source);
        }

        // the graph decides node identity; the turtle keeps its exact
        // position so merging never bends the walk
        self.graph.add_edge(source, destination);
        self.cursor.pos = destination;
        self.stats.forward_steps += 1;

    }

}

//////////////////////////////////////////////////////////////////////
