use bevy::prelude::*;

use crate::components::{DepthKeySource, Orderable};
use crate::resources::{DepthSequence, DrawOrder};
use crate::utils::depth_order::{render_order, OrderEntry};

/// Z of the backmost orderable drawable. Unordered drawables stay at 0,
/// below every orderable.
pub const Z_BASE: f32 = 1.0;
/// Z distance between consecutive drawables.
pub const Z_STEP: f32 = 0.01;

/// Observer that numbers each orderable as it is inserted.
///
/// Observers fire in insertion order, so the sequence follows creation even
/// when Bevy hands out a recycled entity index.
pub fn assign_depth_sequence(
    trigger: Trigger<OnAdd, Orderable>,
    mut sequence: ResMut<DepthSequence>,
    mut orderables: Query<&mut Orderable>,
) {
    if let Ok(mut orderable) = orderables.get_mut(trigger.entity()) {
        if orderable.sequence.is_none() {
            orderable.sequence = Some(sequence.allocate());
        }
    }
}

/// System that re-keys every orderable from its current transform and sorts.
///
/// Runs from scratch each frame; nothing from the previous frame is reused.
pub fn sort_drawables(
    drawables: Query<(Entity, &Orderable, &Transform)>,
    mut order: ResMut<DrawOrder>,
) {
    let entries = drawables.iter().map(|(entity, orderable, transform)| {
        OrderEntry::new(
            entity,
            orderable.depth_key(transform),
            orderable.sequence.unwrap_or(u64::MAX),
        )
    });
    order.entities = render_order(entries);
}

/// System that hands the order to the renderer by stacking z values.
pub fn apply_draw_order(order: Res<DrawOrder>, mut transforms: Query<&mut Transform, With<Orderable>>) {
    for (i, entity) in order.entities.iter().enumerate() {
        if let Ok(mut transform) = transforms.get_mut(*entity) {
            let z = Z_BASE + i as f32 * Z_STEP;
            if transform.translation.z != z {
                transform.translation.z = z;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::DepthKey;

    fn app() -> App {
        let mut app = App::new();
        app.init_resource::<DrawOrder>()
            .init_resource::<DepthSequence>()
            .add_observer(assign_depth_sequence)
            .add_systems(Update, (sort_drawables, apply_draw_order).chain());
        app
    }

    fn spawn_at(app: &mut App, y: f32) -> Entity {
        app.world_mut()
            .spawn((Orderable::new(DepthKey::FootPoint { offset: 0.0 }), Transform::from_xyz(0.0, y, 0.0)))
            .id()
    }

    #[test]
    fn test_equal_keys_keep_creation_order() {
        let mut app = app();
        // Keys are -y: [5, 3, 5, 1]
        let a = spawn_at(&mut app, -5.0);
        let b = spawn_at(&mut app, -3.0);
        let c = spawn_at(&mut app, -5.0);
        let d = spawn_at(&mut app, -1.0);

        for _ in 0..3 {
            app.update();
            assert_eq!(app.world().resource::<DrawOrder>().entities, vec![d, b, a, c]);
        }
    }

    #[test]
    fn test_moving_entity_reorders_next_frame() {
        let mut app = app();
        let back = spawn_at(&mut app, 100.0);
        let front = spawn_at(&mut app, -100.0);
        app.update();
        assert_eq!(app.world().resource::<DrawOrder>().entities, vec![back, front]);

        app.world_mut().get_mut::<Transform>(back).unwrap().translation.y = -500.0;
        app.update();
        assert_eq!(app.world().resource::<DrawOrder>().entities, vec![front, back]);
    }

    #[test]
    fn test_z_follows_order() {
        let mut app = app();
        let back = spawn_at(&mut app, 10.0);
        let front = spawn_at(&mut app, -10.0);
        app.update();
        let z_back = app.world().get::<Transform>(back).unwrap().translation.z;
        let z_front = app.world().get::<Transform>(front).unwrap().translation.z;
        assert!(z_front > z_back);
        assert_eq!(z_back, Z_BASE);
    }

    #[test]
    fn test_sequences_assigned_once() {
        let mut app = app();
        let a = spawn_at(&mut app, 0.0);
        app.update();
        let b = spawn_at(&mut app, 0.0);
        app.update();
        assert_eq!(app.world().get::<Orderable>(a).unwrap().sequence(), Some(0));
        assert_eq!(app.world().get::<Orderable>(b).unwrap().sequence(), Some(1));
    }

    #[test]
    fn test_recycled_index_keeps_creation_order() {
        let mut app = app();
        let x = spawn_at(&mut app, 0.0);
        app.update();

        let c = spawn_at(&mut app, 0.0);
        app.world_mut().despawn(x);
        let d = spawn_at(&mut app, 0.0);
        assert_eq!(d.index(), x.index(), "expected the freed slot to be reused");
        app.update();

        let seq_c = app.world().get::<Orderable>(c).unwrap().sequence().unwrap();
        let seq_d = app.world().get::<Orderable>(d).unwrap().sequence().unwrap();
        assert!(seq_c < seq_d);
        assert_eq!(app.world().resource::<DrawOrder>().entities, vec![c, d]);
    }

    #[test]
    fn test_unordered_drawables_stay_below() {
        let mut app = app();
        let loose = app.world_mut().spawn(Transform::from_xyz(0.0, -1000.0, 0.0)).id();
        let ordered = spawn_at(&mut app, 1000.0);
        app.update();

        let z_loose = app.world().get::<Transform>(loose).unwrap().translation.z;
        let z_ordered = app.world().get::<Transform>(ordered).unwrap().translation.z;
        assert_eq!(z_loose, 0.0);
        assert!(z_ordered > z_loose);
    }
}
