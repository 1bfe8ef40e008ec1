//////////////////////////////////////////////////////////////////////
// grammar description files: a line-oriented way to write down an
// L-system together with the turtle parameters used to walk it.
//
//     # comments run to end of line
//     preset dragon        # optional, fills anything not set below
//     axiom FX
//     rule X X+YF+
//     rule Y -FX-Y
//     rule Z               # no replacement: Z is erased
//     angle_deg 90         # or angle_rad
//     heading_deg 90       # or heading_rad
//     length 4
//     scale 1.36
//     position 0 0
//     generations 10
//     max_length 1000000   # refuse to expand past this many symbols
//
// '#' always starts a comment, so it can't be used as a symbol.

use std::path::Path;
use std::fs::File;
use std::io::{BufRead, BufReader};

use crate::errors::*;
use crate::geom::{Point2d, deg_to_rad};
use crate::library::{Preset, PRESETS};
use crate::lsystem::{LSystem, RuleSet};
use crate::turtle::{Turtle, TurtleConfig};

//////////////////////////////////////////////////////////////////////
// macro for parsing the tokens after a keyword. each entry is
// `name: Type`, parsed with FromStr unless Type is String.

macro_rules! parse_tokens {

    // finalizer - no more input to match, just error if remaining
    // input or return collected outputs
    ($it:ident { } -> { $($tuple:ident,)* } ) => (
        match $it.next() {
            Some(value) => Err(format!("found extra token(s) starting with \"{:}\"", value)),
            None => Ok(($($tuple),*))
        }
    );

    // name, String pair
    ($it:ident { $name:ident : String, $($ts:tt)* } -> { $($tuple:ident,)* } ) => (
        match $it.next() {
            None => Err(format!("missing token for {:}", stringify!($name)) ),
            Some(value) => {
                let $name = value.to_string();
                parse_tokens!( $it { $($ts)* } -> { $($tuple,)* $name, } )
            }
        }
    );

    // name, type pair
    ($it:ident { $name:ident : $type:ident, $($ts:tt)* } -> { $($tuple:ident,)* } ) => (
        match $it.next() {
            None => Err(format!("missing token for {:}", stringify!($name)) ),
            Some(value) => if let Ok($name) = value.parse::<$type>() {
                parse_tokens!( $it { $($ts)* } -> { $($tuple,)* $name, } )
            } else {
                Err(format!("error parsing \"{:}\" as type {:}",
                            value, stringify!($type)))
            }
        }
    );

    // Entry point
    ($a:expr, { $($ts:tt)+ }) => (
        {
            let mut it = $a.iter();
            parse_tokens!( it { $($ts)* , } -> { } )
        }
    );

    // Entry point
    ($a:expr, { }) => (
        {
            let mut it = $a.iter();
            parse_tokens!( it { } -> { } )
        }
    )

}

//////////////////////////////////////////////////////////////////////
// macros for inspecting/validating individual fields of GrammarSpec

macro_rules! copy_field {

    ($dst:ident, $src:ident, $field:ident) => (
        if $src.$field.is_some() {
            if $dst.$field.is_some() {
                bail!("{:} is already set", stringify!($field));
            }
            $dst.$field = $src.$field;
        }
    )

}

macro_rules! ensure_field {

    ($gs:ident, $fvec:ident, $field:ident) => (
        if $gs.$field.is_none() {
            $fvec.push(stringify!($field));
        }
    )

}

//////////////////////////////////////////////////////////////////////
// everything one description file says

#[derive(Debug, Clone, Default)]
pub struct GrammarSpec {
    preset:      Option<&'static Preset>,
    axiom:       Option<String>,
    rules:       Vec<(char, String)>, // in file order, symbols unique
    angle:       Option<f64>,         // turn increment, radians
    heading:     Option<f64>,         // initial heading, radians
    length:      Option<f64>,         // initial step length
    scale:       Option<f64>,         // length factor for > and <
    position:    Option<Point2d>,     // initial position
    generations: Option<usize>,       // rewrite passes to apply
    max_length:  Option<usize>        // cap on expanded string length
}

impl GrammarSpec {

    pub fn new() -> GrammarSpec {
        Default::default()
    }

    fn update(&mut self, other: GrammarSpec) -> Result<()> {

        copy_field!(self, other, preset);
        copy_field!(self, other, axiom);
        copy_field!(self, other, angle);
        copy_field!(self, other, heading);
        copy_field!(self, other, length);
        copy_field!(self, other, scale);
        copy_field!(self, other, position);
        copy_field!(self, other, generations);
        copy_field!(self, other, max_length);

        for (symbol, replacement) in other.rules {
            if self.rules.iter().any(|(s, _)| *s == symbol) {
                bail!("rule for '{:}' is already set", symbol);
            }
            self.rules.push((symbol, replacement));
        }

        Ok(())

    }

    fn parse_keyword(keyword: &str,
                     rest: &[&str]) -> Result<GrammarSpec> {

        let mut update = GrammarSpec::new();

        match keyword {

            "preset" => {

                let name = parse_tokens!(rest, { name: String })?;

                match PRESETS.get(name.as_str()) {
                    Some(preset) => update.preset = Some(preset),
                    None => bail!(ErrorKind::UnknownPreset(name))
                }

            },

            "axiom" => {

                let axiom = parse_tokens!(rest, { axiom: String })?;

                update.axiom = Some(axiom);

            },

            "rule" => {

                // a bare symbol erases itself
                let (symbol, replacement) = if rest.len() == 1 {
                    let symbol = parse_tokens!(rest, { symbol: char })?;
                    (symbol, String::new())
                } else {
                    parse_tokens!(rest, { symbol: char, replacement: String })?
                };

                update.rules.push((symbol, replacement));

            },

            "angle_rad" | "angle_deg" => {

                let mut angle = parse_tokens!(rest, { angle: f64 })?;

                if keyword.ends_with("deg") {
                    angle = deg_to_rad(angle);
                }

                update.angle = Some(angle);

            },

            "heading_rad" | "heading_deg" => {

                let mut heading = parse_tokens!(rest, { heading: f64 })?;

                if keyword.ends_with("deg") {
                    heading = deg_to_rad(heading);
                }

                update.heading = Some(heading);

            },

            "length" => {

                let length = parse_tokens!(rest, { length: f64 })?;

                if !length.is_finite() {
                    bail!("length must be finite");
                }

                update.length = Some(length);

            },

            "scale" => {

                let scale = parse_tokens!(rest, { scale: f64 })?;

                if !(scale > 0.0 && scale.is_finite()) {
                    bail!("scale must be positive");
                }

                update.scale = Some(scale);

            },

            "position" => {

                let (x, y) = parse_tokens!(rest, { x: f64, y: f64 })?;

                update.position = Some(Point2d::new(x, y));

            },

            "generations" => {

                let n = parse_tokens!(rest, { n: usize })?;

                update.generations = Some(n);

            },

            "max_length" => {

                let n = parse_tokens!(rest, { n: usize })?;

                update.max_length = Some(n);

            },

            _ => {
                bail!("unrecognized keyword");
            }

        };

        Ok(update)

    }

    fn update_from(&mut self, line: &str) -> Result<()> {

        let mut trimmed = line.trim();

        if let Some(pos) = trimmed.find('#') {
            trimmed = &trimmed[0..pos];
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();

        if tokens.is_empty() {
            return Ok(());
        }

        let keyword = tokens[0];
        let rest = &tokens[1..];

        let update = Self::parse_keyword(keyword, rest).chain_err(
            || format!("while parsing keyword {:}", keyword))?;

        self.update(update)

    }

    // fill in whatever the file left unset from the named preset
    fn apply_preset(&mut self) {

        let preset = match self.preset {
            None => { return; }
            Some(p) => p
        };

        if self.axiom.is_none() {
            self.axiom = Some(preset.axiom.to_string());
        }

        if self.rules.is_empty() {
            self.rules = preset.rules.iter()
                .map(|&(c, s)| (c, s.to_string()))
                .collect();
        }

        if self.angle.is_none() {
            self.angle = Some(preset.turn_angle());
        }

        if self.scale.is_none() {
            self.scale = Some(preset.length_factor);
        }

    }

    pub fn parse(filename: &str, istr: &mut impl BufRead) -> Result<GrammarSpec> {

        let mut gs = GrammarSpec::new();
        let mut lineno = 0;

        loop {

            let mut line = String::new();

            lineno += 1;

            let len = istr.read_line(&mut line).chain_err(|| format!("{:}:{:}: read error", filename, lineno))?;

            if len == 0 {
                break;
            }

            gs.update_from(line.as_str()).chain_err(|| format!("{:}:{:}: parse error", filename, lineno))?;

        }

        gs.apply_preset();

        let mut unset_fields = Vec::new();

        ensure_field!(gs, unset_fields, axiom);
        ensure_field!(gs, unset_fields, generations);

        if !unset_fields.is_empty() {
            bail!("{:}: the following field(s) were unset: {:}",
                  filename, unset_fields.as_slice().join(", "));
        }

        info!("{:}: axiom {:?}, {:} rule(s), {:} generation(s)",
              filename, gs.axiom(), gs.rules.len(), gs.generations());

        Ok(gs)

    }

    pub fn parse_str(name: &str, text: &str) -> Result<GrammarSpec> {
        Self::parse(name, &mut text.as_bytes())
    }

    pub fn from_file(path: &Path) -> Result<GrammarSpec> {

        let filename = path.to_string_lossy();

        let f = File::open(path).chain_err(|| format!("opening {:}", filename))?;
        let mut reader = BufReader::new(f);

        Self::parse(&filename, &mut reader)

    }

    //////////////////////////////////////////////////
    // accessors

    pub fn preset(&self) -> Option<&'static Preset> {
        self.preset
    }

    pub fn axiom(&self) -> &str {
        self.axiom.as_deref().unwrap_or("")
    }

    pub fn generations(&self) -> usize {
        self.generations.unwrap_or(0)
    }

    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    pub fn rule_set(&self) -> RuleSet {
        self.rules.iter().map(|(c, s)| (*c, s.as_str())).collect()
    }

    // engine at generation zero
    pub fn lsystem(&self) -> LSystem {
        LSystem::new(self.axiom(), self.rule_set())
    }

    // anything the file didn't say falls back to TurtleConfig::default()
    pub fn turtle_config(&self) -> TurtleConfig {

        let defaults = TurtleConfig::default();

        TurtleConfig {
            initial_length: self.length.unwrap_or(defaults.initial_length),
            initial_pos: self.position.unwrap_or(defaults.initial_pos),
            initial_heading: self.heading.unwrap_or(defaults.initial_heading),
            turn_angle: self.angle.unwrap_or(defaults.turn_angle),
            length_factor: self.scale.unwrap_or(defaults.length_factor)
        }

    }

    //////////////////////////////////////////////////
    // run the grammar

    // advance the requested number of generations, checking
    // max_length before each pass
    pub fn expand(&self) -> Result<LSystem> {

        let mut ls = self.lsystem();

        if let Some(limit) = self.max_length {
            let len = ls.current_string().chars().count();
            if len > limit {
                bail!(ErrorKind::ExpansionTooLong(limit, len));
            }
        }

        for _ in 0..self.generations() {

            if let Some(limit) = self.max_length {
                let next = ls.expanded_len();
                if next > limit {
                    bail!(ErrorKind::ExpansionTooLong(limit, next));
                }
            }

            ls.advance_generation();

        }

        Ok(ls)

    }

    // expand, then walk the final generation
    pub fn walk(&self) -> Result<Turtle> {

        let ls = self.expand()?;

        let mut turtle = Turtle::new(self.turtle_config());
        turtle.run(ls.current_string());

        Ok(turtle)

    }

}

//////////////////////////////////////////////////////////////////////
