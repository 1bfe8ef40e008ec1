//////////////////////////////////////////////////////////////////////
// a small catalog of named grammars. these are plain data: nothing
// in the engine or the turtle knows they exist.

use phf::phf_map;

use crate::geom::deg_to_rad;
use crate::lsystem::{LSystem, RuleSet};
use crate::turtle::TurtleConfig;

// a preset pairs drawing parameters with a grammar. angles are
// stored in degrees, the way they're usually published.
#[derive(Debug, PartialEq)]
pub struct Preset {
    pub name:          &'static str,
    pub description:   &'static str,
    pub angle_deg:     f64,
    pub length_factor: f64,
    pub axiom:         &'static str,
    pub rules:         &'static [(char, &'static str)]
}

impl Preset {

    pub fn rule_set(&self) -> RuleSet {
        RuleSet::from_pairs(self.rules)
    }

    // fresh engine at generation zero
    pub fn lsystem(&self) -> LSystem {
        LSystem::new(self.axiom, self.rule_set())
    }

    pub fn turn_angle(&self) -> f64 {
        deg_to_rad(self.angle_deg)
    }

    // default start pose with this preset's angle and factor
    pub fn turtle_config(&self, initial_length: f64) -> TurtleConfig {
        TurtleConfig {
            initial_length,
            turn_angle: self.turn_angle(),
            length_factor: self.length_factor,
            ..Default::default()
        }
    }

}

// define a lookup table matching names to presets
pub static PRESETS: phf::Map<&'static str, Preset> = phf_map! {

    "koch" => Preset {
        name: "koch",
        description: "Koch snowflake",
        angle_deg: 60.0,
        length_factor: 1.0,
        axiom: "F++F++F",
        rules: &[('F', "F-F++F-F")]
    },

    "koch_island" => Preset {
        name: "koch_island",
        description: "quadratic Koch island",
        angle_deg: 90.0,
        length_factor: 1.0,
        axiom: "F+F+F+F",
        rules: &[('F', "F+F-F-FF+F+F-F")]
    },

    "dragon" => Preset {
        name: "dragon",
        description: "Heighway dragon",
        angle_deg: 90.0,
        length_factor: 1.0,
        axiom: "FX",
        rules: &[('X', "X+YF+"),
                 ('Y', "-FX-Y")]
    },

    "terdragon" => Preset {
        name: "terdragon",
        description: "Davis-Knuth terdragon",
        angle_deg: 120.0,
        length_factor: 1.0,
        axiom: "F",
        rules: &[('F', "F+F-F")]
    },

    "levy" => Preset {
        name: "levy",
        description: "Levy C curve",
        angle_deg: 45.0,
        length_factor: 1.0,
        axiom: "F",
        rules: &[('F', "+F--F+")]
    },

    "hilbert" => Preset {
        name: "hilbert",
        description: "Hilbert curve",
        angle_deg: 90.0,
        length_factor: 1.0,
        axiom: "X",
        rules: &[('X', "-YF+XFX+FY-"),
                 ('Y', "+XF-YFY-FX+")]
    },

    "sierpinski" => Preset {
        name: "sierpinski",
        description: "Sierpinski square curve",
        angle_deg: 90.0,
        length_factor: 1.0,
        axiom: "F+XF+F+XF",
        rules: &[('X', "XF-F+F-XF+F+XF-F+F-X")]
    },

    "shrinking_h" => Preset {
        name: "shrinking_h",
        description: "H-tree whose arms shrink each level",
        angle_deg: 90.0,
        length_factor: 0.7071067811865476,
        axiom: "X",
        rules: &[('X', "[F>+X<]-F>+X<")]
    },

};

pub fn preset(name: &str) -> Option<&'static Preset> {
    PRESETS.get(name)
}

// catalog names in sorted order (phf iteration order is arbitrary)
pub fn preset_names() -> Vec<&'static str> {

    let mut names: Vec<&'static str> = PRESETS.keys().cloned().collect();
    names.sort();

    names

}

//////////////////////////////////////////////////////////////////////
