//! Descriptor lookup by object id
//!
//! Each [`DescKind`] owns one constructor producing a default descriptor for
//! an object id. A lookup first searches the descriptors a platform
//! configured and only falls back to the constructor when none matches.

use std::collections::HashMap;

use crate::desc::{FanDesc, ObjectId, SensorDesc, SensorGroupDesc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DescKind {
    Fans,
    Sensors,
    Voltages,
    Currents,
    Powers,
}

impl DescKind {
    pub const ALL: [DescKind; 5] = [
        DescKind::Fans,
        DescKind::Sensors,
        DescKind::Voltages,
        DescKind::Currents,
        DescKind::Powers,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DescKind::Fans => "fans",
            DescKind::Sensors => "sensors",
            DescKind::Voltages => "voltages",
            DescKind::Currents => "currents",
            DescKind::Powers => "powers",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComponentDesc {
    Fan(FanDesc),
    Sensor(SensorDesc),
    Voltage(SensorGroupDesc),
    Current(SensorGroupDesc),
    Power(SensorGroupDesc),
}

impl ComponentDesc {
    pub fn kind(&self) -> DescKind {
        match self {
            ComponentDesc::Fan(_) => DescKind::Fans,
            ComponentDesc::Sensor(_) => DescKind::Sensors,
            ComponentDesc::Voltage(_) => DescKind::Voltages,
            ComponentDesc::Current(_) => DescKind::Currents,
            ComponentDesc::Power(_) => DescKind::Powers,
        }
    }

    /// Object id of the component. Sensors number diodes from zero, so a
    /// sensor on the last diode has none.
    pub fn oid(&self) -> Option<ObjectId> {
        match self {
            ComponentDesc::Fan(d) => Some(ObjectId(d.fan_id)),
            ComponentDesc::Sensor(d) => d.temp_id().ok().map(ObjectId),
            ComponentDesc::Voltage(d) | ComponentDesc::Current(d) | ComponentDesc::Power(d) => {
                Some(ObjectId(d.id))
            }
        }
    }
}

pub type DescConstructor = fn(ObjectId) -> ComponentDesc;

fn fan_for_id(oid: ObjectId) -> ComponentDesc {
    ComponentDesc::Fan(FanDesc::new(oid.0))
}

fn sensor_for_id(oid: ObjectId) -> ComponentDesc {
    ComponentDesc::Sensor(SensorDesc::new(oid.0.saturating_sub(1)))
}

fn voltage_for_id(oid: ObjectId) -> ComponentDesc {
    ComponentDesc::Voltage(SensorGroupDesc::new(oid.0))
}

fn current_for_id(oid: ObjectId) -> ComponentDesc {
    ComponentDesc::Current(SensorGroupDesc::new(oid.0))
}

fn power_for_id(oid: ObjectId) -> ComponentDesc {
    ComponentDesc::Power(SensorGroupDesc::new(oid.0))
}

#[derive(Debug, Clone)]
pub struct DescRegistry {
    constructors: HashMap<DescKind, DescConstructor>,
    configured: Vec<ComponentDesc>,
}

impl Default for DescRegistry {
    fn default() -> Self {
        let constructors: HashMap<DescKind, DescConstructor> = HashMap::from([
            (DescKind::Fans, fan_for_id as DescConstructor),
            (DescKind::Sensors, sensor_for_id as DescConstructor),
            (DescKind::Voltages, voltage_for_id as DescConstructor),
            (DescKind::Currents, current_for_id as DescConstructor),
            (DescKind::Powers, power_for_id as DescConstructor),
        ]);
        Self {
            constructors,
            configured: Vec::new(),
        }
    }
}

impl DescRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_descs(descs: impl IntoIterator<Item = ComponentDesc>) -> Self {
        let mut registry = Self::default();
        registry.configured.extend(descs);
        registry
    }

    pub fn add(&mut self, desc: ComponentDesc) {
        self.configured.push(desc);
    }

    /// Replace the default constructor for one kind
    pub fn set_constructor(&mut self, kind: DescKind, ctor: DescConstructor) {
        self.constructors.insert(kind, ctor);
    }

    /// Configured descriptor for `oid`, else the kind's default
    pub fn desc_for_id(&self, kind: DescKind, oid: ObjectId) -> Option<ComponentDesc> {
        self.configured
            .iter()
            .find(|d| d.kind() == kind && d.oid() == Some(oid))
            .cloned()
            .or_else(|| self.constructors.get(&kind).map(|ctor| ctor(oid)))
    }

    pub fn configured(&self, kind: DescKind) -> impl Iterator<Item = &ComponentDesc> {
        self.configured.iter().filter(move |d| d.kind() == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_desc_wins() {
        let named = SensorDesc {
            name: Some("Inlet".into()),
            ..SensorDesc::new(0)
        };
        let registry = DescRegistry::with_descs([ComponentDesc::Sensor(named.clone())]);
        assert_eq!(
            registry.desc_for_id(DescKind::Sensors, ObjectId(1)),
            Some(ComponentDesc::Sensor(named))
        );
    }

    #[test]
    fn test_default_desc_from_constructor() {
        let registry = DescRegistry::new();
        match registry.desc_for_id(DescKind::Sensors, ObjectId(4)) {
            Some(ComponentDesc::Sensor(d)) => assert_eq!(d.diode, 3),
            other => panic!("unexpected {:?}", other),
        }
        match registry.desc_for_id(DescKind::Powers, ObjectId(2)) {
            Some(ComponentDesc::Power(d)) => assert_eq!(d.id, 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_kind_must_match() {
        let registry = DescRegistry::with_descs([ComponentDesc::Voltage(SensorGroupDesc {
            name: Some("12V".into()),
            ..SensorGroupDesc::new(1)
        })]);
        match registry.desc_for_id(DescKind::Currents, ObjectId(1)) {
            Some(ComponentDesc::Current(d)) => assert_eq!(d.name, None),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(registry.configured(DescKind::Voltages).count(), 1);
    }

    #[test]
    fn test_custom_constructor() {
        fn named_fan(oid: ObjectId) -> ComponentDesc {
            ComponentDesc::Fan(FanDesc {
                name: Some(format!("Fan tray {}", oid)),
                ..FanDesc::new(oid.0)
            })
        }
        let mut registry = DescRegistry::new();
        registry.set_constructor(DescKind::Fans, named_fan);
        match registry.desc_for_id(DescKind::Fans, ObjectId(2)) {
            Some(ComponentDesc::Fan(d)) => assert_eq!(d.rendered_name(), "Fan tray 2"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(DescKind::Fans.name(), "fans");
    }

    #[test]
    fn test_last_diode_never_matches() {
        let last = ComponentDesc::Sensor(SensorDesc::new(u32::MAX));
        assert_eq!(last.oid(), None);
        let registry = DescRegistry::with_descs([last]);
        match registry.desc_for_id(DescKind::Sensors, ObjectId(0)) {
            Some(ComponentDesc::Sensor(d)) => assert_eq!(d.diode, 0),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            ComponentDesc::Sensor(SensorDesc::new(2)).oid(),
            Some(ObjectId(3))
        );
    }
}
