use axledyn_core::Vec3;

/// Impact notification from the host integrator, forwarded to any module
/// that registered interest. Telemetry-only today; the seam stays generic.
#[derive(Copy, Clone, Debug)]
pub struct CollisionEvent {
    pub impulse: f32,
    pub point: Vec3,
}

pub trait CollisionSink {
    fn on_collision(&mut self, event: &CollisionEvent);
}

#[cfg(test)]
mod tests {
    use super::*;
    use axledyn_core::vec3;

    struct Counter(u32);
    impl CollisionSink for Counter {
        fn on_collision(&mut self, _event: &CollisionEvent) {
            self.0 += 1;
        }
    }

    #[test]
    fn sink_receives_events() {
        let mut c = Counter(0);
        let e = CollisionEvent { impulse: 420.0, point: vec3(1.0, 0.0, 0.0) };
        c.on_collision(&e);
        c.on_collision(&e);
        assert_eq!(c.0, 2);
    }
}
