use crate::units::Mass as Kilograms;
use glam::I64Vec2;

use super::EntityId;

/// Component kinds, in signature bit order. Kind 0 is reserved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub(crate) enum ComponentKind {
    Empty = 0,
    Position,
    Velocity,
    Mass,
    Name,
    Orbital,
    RenderCircle,
}

pub(crate) const KIND_COUNT: usize = 7;

impl ComponentKind {
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// World-space position in kilometers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Position(pub(crate) I64Vec2);

/// Reserved for kinematic bodies; nothing integrates it yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Velocity(pub(crate) I64Vec2);

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Mass(pub(crate) Kilograms);

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Name(pub(crate) String);

/// Keplerian elements relative to `origin`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Orbital {
    pub(crate) origin: EntityId,
    /// Semi-major axis, km.
    pub(crate) a: i64,
    pub(crate) e: f64,
    /// Argument of periapsis, rad.
    pub(crate) w: f64,
    /// Mean anomaly at epoch, rad.
    pub(crate) m: f64,
    /// Period in seconds; 0 until first propagated.
    pub(crate) period: f64,
    /// True anomaly from the last propagation, rad.
    pub(crate) v: f64,
}

/// Display radius in km.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct RenderCircle(pub(crate) i64);

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) enum Component {
    #[default]
    Empty,
    Position(Position),
    Velocity(Velocity),
    Mass(Mass),
    Name(Name),
    Orbital(Orbital),
    RenderCircle(RenderCircle),
}

impl Component {
    pub(crate) fn kind(&self) -> ComponentKind {
        match self {
            Component::Empty => ComponentKind::Empty,
            Component::Position(_) => ComponentKind::Position,
            Component::Velocity(_) => ComponentKind::Velocity,
            Component::Mass(_) => ComponentKind::Mass,
            Component::Name(_) => ComponentKind::Name,
            Component::Orbital(_) => ComponentKind::Orbital,
            Component::RenderCircle(_) => ComponentKind::RenderCircle,
        }
    }
}

/// Maps a payload type onto its `Component` variant.
pub(crate) trait ComponentType: Sized {
    const KIND: ComponentKind;

    fn wrap(self) -> Component;
    fn peek(c: &Component) -> Option<&Self>;
    fn peek_mut(c: &mut Component) -> Option<&mut Self>;
}

macro_rules! component_type {
    ($ty:ident) => {
        impl ComponentType for $ty {
            const KIND: ComponentKind = ComponentKind::$ty;

            fn wrap(self) -> Component {
                Component::$ty(self)
            }

            fn peek(c: &Component) -> Option<&Self> {
                match c {
                    Component::$ty(v) => Some(v),
                    _ => None,
                }
            }

            fn peek_mut(c: &mut Component) -> Option<&mut Self> {
                match c {
                    Component::$ty(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

component_type!(Position);
component_type!(Velocity);
component_type!(Mass);
component_type!(Name);
component_type!(Orbital);
component_type!(RenderCircle);

/// One bit per `ComponentKind`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Signature(u8);

impl Signature {
    pub(crate) fn set(&mut self, kind: ComponentKind) {
        self.0 |= 1 << kind.index();
    }

    pub(crate) fn clear(&mut self, kind: ComponentKind) {
        self.0 &= !(1 << kind.index());
    }

    pub(crate) fn has(&self, kind: ComponentKind) -> bool {
        (self.0 >> kind.index()) & 1 == 1
    }

    pub(crate) fn reset(&mut self) {
        self.0 = 0;
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_bits_are_independent() {
        let mut sig = Signature::default();
        assert!(sig.is_empty());
        sig.set(ComponentKind::Orbital);
        sig.set(ComponentKind::Name);
        assert!(sig.has(ComponentKind::Orbital));
        assert!(sig.has(ComponentKind::Name));
        assert!(!sig.has(ComponentKind::Position));
        sig.clear(ComponentKind::Orbital);
        assert!(!sig.has(ComponentKind::Orbital));
        assert!(sig.has(ComponentKind::Name));
        sig.reset();
        assert!(sig.is_empty());
    }

    #[test]
    fn payloads_round_trip_through_the_union() {
        let c = Position(I64Vec2::new(4, -2)).wrap();
        assert_eq!(c.kind(), ComponentKind::Position);
        assert_eq!(Position::peek(&c), Some(&Position(I64Vec2::new(4, -2))));
        assert!(Name::peek(&c).is_none());
    }
}
