//! Player position enumeration.
//!
//! Each position is a `(name, code, parent)` tuple; the code is what the
//! `player_positions` table stores. Parents form a small hierarchy rooted at
//! the four lines (GK, DEF, MID, ATT).

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum PositionType {
    Unknown,

    Goalkeeper,

    Defender,
    FullBack,
    LeftBack,
    RightBack,
    CenterBack,
    LeftCenterBack,
    RightCenterBack,
    WingBack,
    LeftWingBack,
    RightWingBack,

    Midfielder,
    DefensiveMidfield,
    LeftDefensiveMidfield,
    CenterDefensiveMidfield,
    RightDefensiveMidfield,
    CentralMidfield,
    LeftCentralMidfield,
    RightCentralMidfield,
    AttackingMidfield,
    LeftAttackingMidfield,
    CenterAttackingMidfield,
    RightAttackingMidfield,
    WideMidfield,
    LeftWing,
    RightWing,
    LeftMidfield,
    RightMidfield,

    Attacker,
    LeftForward,
    Striker,
    CenterForward,
    RightForward,
}

/// Every position code, in declaration order.
pub const POSITION_CODES: &[&str] = &[
    "UNK", "GK", "DEF", "FB", "LB", "RB", "CB", "LCB", "RCB", "WB", "LWB", "RWB", "MID", "DM",
    "LDM", "CDM", "RDM", "CM", "LCM", "RCM", "AM", "LAM", "CAM", "RAM", "WM", "LW", "RW", "LM",
    "RM", "ATT", "LF", "ST", "CF", "RF",
];

impl PositionType {
    pub fn as_tuple(&self) -> (&'static str, &'static str, Option<PositionType>) {
        use PositionType::*;
        match self {
            Unknown => ("Unknown", "UNK", None),
            Goalkeeper => ("Goalkeeper", "GK", None),
            Defender => ("Defender", "DEF", None),
            FullBack => ("Full Back", "FB", Some(Defender)),
            LeftBack => ("Left Back", "LB", Some(FullBack)),
            RightBack => ("Right Back", "RB", Some(FullBack)),
            CenterBack => ("Center Back", "CB", Some(Defender)),
            LeftCenterBack => ("Left Center Back", "LCB", Some(CenterBack)),
            RightCenterBack => ("Right Center Back", "RCB", Some(CenterBack)),
            WingBack => ("Wing Back", "WB", Some(FullBack)),
            LeftWingBack => ("Left Wing Back", "LWB", Some(WingBack)),
            RightWingBack => ("Right Wing Back", "RWB", Some(WingBack)),
            Midfielder => ("Midfielder", "MID", None),
            DefensiveMidfield => ("Defensive Midfield", "DM", Some(Midfielder)),
            LeftDefensiveMidfield => ("Left Defensive Midfield", "LDM", Some(DefensiveMidfield)),
            CenterDefensiveMidfield => {
                ("Center Defensive Midfield", "CDM", Some(DefensiveMidfield))
            }
            RightDefensiveMidfield => {
                ("Right Defensive Midfield", "RDM", Some(DefensiveMidfield))
            }
            CentralMidfield => ("Central Midfield", "CM", Some(Midfielder)),
            LeftCentralMidfield => ("Left Central Midfield", "LCM", Some(CentralMidfield)),
            RightCentralMidfield => ("Right Central Midfield", "RCM", Some(CentralMidfield)),
            AttackingMidfield => ("Attacking Midfield", "AM", Some(Midfielder)),
            LeftAttackingMidfield => ("Left Attacking Midfield", "LAM", Some(AttackingMidfield)),
            CenterAttackingMidfield => {
                ("Center Attacking Midfield", "CAM", Some(AttackingMidfield))
            }
            RightAttackingMidfield => {
                ("Right Attacking Midfield", "RAM", Some(AttackingMidfield))
            }
            WideMidfield => ("Wide Midfield", "WM", Some(Midfielder)),
            LeftWing => ("Left Wing", "LW", Some(WideMidfield)),
            RightWing => ("Right Wing", "RW", Some(WideMidfield)),
            LeftMidfield => ("Left Midfield", "LM", Some(WideMidfield)),
            RightMidfield => ("Right Midfield", "RM", Some(WideMidfield)),
            Attacker => ("Attacker", "ATT", None),
            LeftForward => ("Left Forward", "LF", Some(Attacker)),
            Striker => ("Striker", "ST", Some(Attacker)),
            CenterForward => ("Center Forward", "CF", Some(Attacker)),
            RightForward => ("Right Forward", "RF", Some(Attacker)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.as_tuple().0
    }

    pub fn code(&self) -> &'static str {
        self.as_tuple().1
    }

    pub fn parent(&self) -> Option<PositionType> {
        self.as_tuple().2
    }

    /// True if `self` equals `other` or sits below it in the hierarchy.
    pub fn is_within(&self, other: PositionType) -> bool {
        let mut current = Some(*self);
        while let Some(pos) = current {
            if pos == other {
                return true;
            }
            current = pos.parent();
        }
        false
    }

    pub fn from_code(code: &str) -> Option<Self> {
        use PositionType::*;
        let pos = match code {
            "UNK" => Unknown,
            "GK" => Goalkeeper,
            "DEF" => Defender,
            "FB" => FullBack,
            "LB" => LeftBack,
            "RB" => RightBack,
            "CB" => CenterBack,
            "LCB" => LeftCenterBack,
            "RCB" => RightCenterBack,
            "WB" => WingBack,
            "LWB" => LeftWingBack,
            "RWB" => RightWingBack,
            "MID" => Midfielder,
            "DM" => DefensiveMidfield,
            "LDM" => LeftDefensiveMidfield,
            "CDM" => CenterDefensiveMidfield,
            "RDM" => RightDefensiveMidfield,
            "CM" => CentralMidfield,
            "LCM" => LeftCentralMidfield,
            "RCM" => RightCentralMidfield,
            "AM" => AttackingMidfield,
            "LAM" => LeftAttackingMidfield,
            "CAM" => CenterAttackingMidfield,
            "RAM" => RightAttackingMidfield,
            "WM" => WideMidfield,
            "LW" => LeftWing,
            "RW" => RightWing,
            "LM" => LeftMidfield,
            "RM" => RightMidfield,
            "ATT" => Attacker,
            "LF" => LeftForward,
            "ST" => Striker,
            "CF" => CenterForward,
            "RF" => RightForward,
            _ => return None,
        };
        Some(pos)
    }

    /// The top-level line this position belongs to.
    pub fn line(&self) -> PositionType {
        let mut pos = *self;
        while let Some(parent) = pos.parent() {
            pos = parent;
        }
        pos
    }
}

/// Extracts the short code (second element) from a position tuple.
///
/// Accepts anything tuple-like, e.g. `["Goalkeeper", "GK", ""]` or a pair
/// exported as `("GK_FULL", "GK")`.
pub fn resolve_position<S: AsRef<str>>(tuple: &[S]) -> Result<&str> {
    match tuple.get(1) {
        Some(code) => Ok(code.as_ref()),
        None => Err(SchemaError::UnknownPosition { len: tuple.len() }),
    }
}
