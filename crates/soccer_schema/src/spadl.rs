//! SPADL vocabularies (action types, results, body parts).
//!
//! Ids follow the SPADL reference ordering so rows exported with numeric
//! `type_id`/`result_id`/`bodypart_id` columns map onto the same names.

use serde::{Deserialize, Serialize};

macro_rules! vocabulary {
    ($(#[$meta:meta])* $name:ident, $names:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[cfg_attr(test, derive(strum_macros::EnumIter))]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        pub const $names: &[&str] = &[$($text),+];

        impl $name {
            pub fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }

            pub fn id(&self) -> u8 {
                *self as u8
            }

            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }

            pub fn from_id(id: u8) -> Option<Self> {
                $names.get(id as usize).and_then(|name| Self::from_name(name))
            }
        }
    };
}

vocabulary!(
    /// SPADL action types (23).
    SpadlActionType, SPADL_ACTION_TYPES {
        Pass => "pass",
        Cross => "cross",
        ThrowIn => "throw_in",
        FreekickCrossed => "freekick_crossed",
        FreekickShort => "freekick_short",
        CornerCrossed => "corner_crossed",
        CornerShort => "corner_short",
        TakeOn => "take_on",
        Foul => "foul",
        Tackle => "tackle",
        Interception => "interception",
        Shot => "shot",
        ShotPenalty => "shot_penalty",
        ShotFreekick => "shot_freekick",
        KeeperSave => "keeper_save",
        KeeperClaim => "keeper_claim",
        KeeperPunch => "keeper_punch",
        KeeperPickUp => "keeper_pick_up",
        Clearance => "clearance",
        BadTouch => "bad_touch",
        NonAction => "non_action",
        Dribble => "dribble",
        Goalkick => "goalkick",
    }
);

vocabulary!(
    /// SPADL action results.
    SpadlResult, SPADL_RESULTS {
        Fail => "fail",
        Success => "success",
        Offside => "offside",
        OwnGoal => "owngoal",
        YellowCard => "yellow_card",
        RedCard => "red_card",
    }
);

vocabulary!(
    /// SPADL body parts.
    SpadlBodyPart, SPADL_BODYPARTS {
        Foot => "foot",
        Head => "head",
        Other => "other",
        HeadOther => "head/other",
        FootLeft => "foot_left",
        FootRight => "foot_right",
    }
);

impl SpadlActionType {
    pub fn is_shot(&self) -> bool {
        matches!(
            self,
            SpadlActionType::Shot | SpadlActionType::ShotPenalty | SpadlActionType::ShotFreekick
        )
    }

    pub fn is_keeper_action(&self) -> bool {
        matches!(
            self,
            SpadlActionType::KeeperSave
                | SpadlActionType::KeeperClaim
                | SpadlActionType::KeeperPunch
                | SpadlActionType::KeeperPickUp
        )
    }
}
