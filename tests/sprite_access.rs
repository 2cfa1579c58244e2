use glam::{Mat4, Vec2, Vec3, Vec4};

use sprite_data::{
    BoneWeight, Color32, SpriteBone, SpriteDataError, SpriteLayout, SpriteMeshData,
    SpriteRendererData, VertexChannel,
};

fn quad() -> Vec<Vec3> {
    vec![
        Vec3::new(-0.5, -0.5, 0.0),
        Vec3::new(0.5, -0.5, 0.0),
        Vec3::new(0.5, 0.5, 0.0),
        Vec3::new(-0.5, 0.5, 0.0),
    ]
}

// ---------------------------------------------------------------------------
// Full sprite lifecycle: fill channels → read → resize → re-read
// ---------------------------------------------------------------------------

#[test]
fn quad_write_read_resize() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut sprite = SpriteMeshData::new(SpriteLayout::standard());
    sprite.set_vertex_count(4);

    let positions = quad();
    sprite
        .set_channel(VertexChannel::Position, &positions)
        .unwrap();

    // Read back through a fresh view; elements match what was written.
    let view = sprite.channel::<Vec3>(VertexChannel::Position).unwrap();
    assert_eq!(view.len(), 4);
    for (i, expected) in positions.iter().enumerate() {
        assert_eq!(view.get(i).unwrap(), *expected);
    }

    // Shrinking the sprite stales the old view on every access path.
    sprite.set_vertex_count(2);
    assert!(matches!(
        view.get(0),
        Err(SpriteDataError::StaleView { .. })
    ));
    assert!(view.to_vec().is_err());
    assert!(view.iter().next().unwrap().is_err());

    // A fresh view observes the new count and the preserved prefix.
    let fresh = sprite.channel::<Vec3>(VertexChannel::Position).unwrap();
    assert_eq!(fresh.len(), 2);
    assert_eq!(fresh.to_vec().unwrap(), positions[..2]);
}

#[test]
fn every_channel_of_the_full_layout_round_trips() {
    let mut sprite = SpriteMeshData::new(SpriteLayout::full());
    sprite.set_vertex_count(3);

    let positions = vec![Vec3::X, Vec3::Y, Vec3::Z];
    let normals = vec![Vec3::Z; 3];
    let tangents = vec![Vec4::new(1.0, 0.0, 0.0, 1.0); 3];
    let colors = vec![
        Color32::new(255, 0, 0, 255),
        Color32::new(0, 255, 0, 255),
        Color32::new(0, 0, 255, 255),
    ];
    let uvs = vec![Vec2::ZERO, Vec2::X, Vec2::ONE];

    sprite
        .set_channel(VertexChannel::Position, &positions)
        .unwrap();
    sprite.set_channel(VertexChannel::Normal, &normals).unwrap();
    sprite
        .set_channel(VertexChannel::Tangent, &tangents)
        .unwrap();
    sprite.set_channel(VertexChannel::Color, &colors).unwrap();
    for channel in [
        VertexChannel::TexCoord0,
        VertexChannel::TexCoord1,
        VertexChannel::TexCoord2,
        VertexChannel::TexCoord3,
    ] {
        sprite.set_channel(channel, &uvs).unwrap();
    }

    assert_eq!(
        sprite
            .channel::<Vec3>(VertexChannel::Position)
            .unwrap()
            .to_vec()
            .unwrap(),
        positions
    );
    assert_eq!(
        sprite
            .channel::<Vec3>(VertexChannel::Normal)
            .unwrap()
            .to_vec()
            .unwrap(),
        normals
    );
    assert_eq!(
        sprite
            .channel::<Vec4>(VertexChannel::Tangent)
            .unwrap()
            .to_vec()
            .unwrap(),
        tangents
    );
    assert_eq!(
        sprite
            .channel::<Color32>(VertexChannel::Color)
            .unwrap()
            .to_vec()
            .unwrap(),
        colors
    );
    assert_eq!(
        sprite
            .channel::<Vec2>(VertexChannel::TexCoord3)
            .unwrap()
            .to_vec()
            .unwrap(),
        uvs
    );

    // Writing one channel leaves its neighbours in the interleaved record
    // untouched.
    sprite
        .set_channel(VertexChannel::Normal, &[Vec3::X; 3])
        .unwrap();
    assert_eq!(
        sprite
            .channel::<Vec3>(VertexChannel::Position)
            .unwrap()
            .to_vec()
            .unwrap(),
        positions
    );
    assert_eq!(
        sprite
            .channel::<Color32>(VertexChannel::Color)
            .unwrap()
            .to_vec()
            .unwrap(),
        colors
    );
}

// ---------------------------------------------------------------------------
// Type and channel validation
// ---------------------------------------------------------------------------

#[test]
fn wrong_element_type_is_rejected_before_any_write() {
    let mut sprite = SpriteMeshData::new(SpriteLayout::standard());
    sprite.set_vertex_count(2);
    let positions = vec![Vec3::X, Vec3::Y];
    sprite
        .set_channel(VertexChannel::Position, &positions)
        .unwrap();

    // Read path.
    assert!(matches!(
        sprite.channel::<Vec2>(VertexChannel::Position),
        Err(SpriteDataError::TypeMismatch { .. })
    ));

    // Write path: rejected without touching the stored data.
    let bogus = vec![Vec2::ONE, Vec2::ONE];
    assert!(matches!(
        sprite.set_channel(VertexChannel::Position, &bogus),
        Err(SpriteDataError::TypeMismatch { .. })
    ));
    assert_eq!(
        sprite
            .channel::<Vec3>(VertexChannel::Position)
            .unwrap()
            .to_vec()
            .unwrap(),
        positions
    );
}

#[test]
fn skinning_attributes_are_not_sprite_channels() {
    let sprite = SpriteMeshData::new(SpriteLayout::full());
    assert!(matches!(
        sprite.channel::<Vec4>(VertexChannel::Joints),
        Err(SpriteDataError::UnsupportedChannel { .. })
    ));
    assert!(matches!(
        sprite.channel::<Vec4>(VertexChannel::Weights),
        Err(SpriteDataError::UnsupportedChannel { .. })
    ));
}

#[test]
fn absent_channel_reports_no_such_channel() {
    let sprite = SpriteMeshData::new(SpriteLayout::standard());
    assert_eq!(
        sprite.channel::<Vec3>(VertexChannel::Normal).unwrap_err(),
        SpriteDataError::NoSuchChannel {
            channel: VertexChannel::Normal
        }
    );
    assert!(sprite.channel_descriptor(VertexChannel::Tangent).is_err());
}

// ---------------------------------------------------------------------------
// Independent buffers: indices, bind poses, bone weights
// ---------------------------------------------------------------------------

#[test]
fn auxiliary_buffers_do_not_track_vertex_count() {
    let mut sprite = SpriteMeshData::new(SpriteLayout::standard());
    sprite.set_vertex_count(4);
    sprite.set_indices(&[0, 1, 2, 2, 3, 0]);
    sprite.set_bind_poses(&[Mat4::IDENTITY; 2]);
    sprite.set_bone_weights(&[BoneWeight::single(1); 4]);

    sprite.set_vertex_count(8);

    assert_eq!(sprite.indices().unwrap().len(), 6);
    assert_eq!(sprite.bind_poses().unwrap().len(), 2);
    assert_eq!(sprite.bone_weights().unwrap().len(), 4);

    let indices = sprite.indices().unwrap();
    assert_eq!(indices.to_vec().unwrap(), vec![0, 1, 2, 2, 3, 0]);
}

#[test]
fn auxiliary_resize_stales_vertex_views_too() {
    // One generation counter per sprite: reallocating any of its buffers
    // invalidates every outstanding view of that sprite.
    let mut sprite = SpriteMeshData::new(SpriteLayout::standard());
    sprite.set_vertex_count(4);
    sprite
        .set_channel(VertexChannel::Position, &quad())
        .unwrap();

    let positions = sprite.channel::<Vec3>(VertexChannel::Position).unwrap();
    sprite.set_indices(&[0, 1, 2]);

    assert!(matches!(
        positions.get(0),
        Err(SpriteDataError::StaleView { .. })
    ));
}

// ---------------------------------------------------------------------------
// Bone hierarchy
// ---------------------------------------------------------------------------

#[test]
fn bone_cycle_is_rejected_atomically() {
    let mut sprite = SpriteMeshData::new(SpriteLayout::standard());
    let skeleton = vec![
        SpriteBone::new("hip"),
        SpriteBone::new("spine")
            .with_parent(0)
            .with_position(Vec3::new(0.0, 0.2, 0.0))
            .with_length(0.2),
        SpriteBone::new("head").with_parent(1).with_length(0.1),
    ];
    sprite.set_bones(skeleton.clone()).unwrap();

    let cyclic = vec![
        SpriteBone::new("a").with_parent(1),
        SpriteBone::new("b").with_parent(0),
    ];
    assert!(matches!(
        sprite.set_bones(cyclic),
        Err(SpriteDataError::InvalidHierarchy { .. })
    ));

    // The rejection left the previous skeleton in place.
    assert_eq!(sprite.bones(), skeleton);
}

// ---------------------------------------------------------------------------
// Renderer deformable buffer
// ---------------------------------------------------------------------------

#[test]
fn deformable_buffer_lifecycle() {
    let mut renderer = SpriteRendererData::new();

    // Inactive until the pipeline hands over a buffer.
    assert_eq!(
        renderer.deformable_positions().unwrap_err(),
        SpriteDataError::BufferInactive
    );

    let deformed = quad();
    renderer.activate_deformable_buffer(&deformed);
    let view = renderer.deformable_positions().unwrap();
    assert_eq!(view.to_vec().unwrap(), deformed);

    renderer.deactivate_deformable_buffer();
    assert_eq!(
        renderer.deformable_positions().unwrap_err(),
        SpriteDataError::BufferInactive
    );
    assert!(matches!(
        view.get(0),
        Err(SpriteDataError::StaleView { .. })
    ));

    // Reactivation (an external pipeline event) restores access.
    renderer.activate_deformable_buffer(&deformed[..2]);
    assert_eq!(renderer.deformable_positions().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// The four-vertex scenario end to end
// ---------------------------------------------------------------------------

#[test]
fn four_vertex_scenario() {
    let mut sprite = SpriteMeshData::new(SpriteLayout::standard());
    sprite.set_vertex_count(4);
    assert_eq!(sprite.vertex_count(), 4);

    let positions = vec![
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(2.0, 1.0, 0.0),
        Vec3::new(2.0, 2.0, 0.0),
        Vec3::new(1.0, 2.0, 0.0),
    ];
    sprite
        .set_channel(VertexChannel::Position, &positions)
        .unwrap();

    let view = sprite.channel::<Vec3>(VertexChannel::Position).unwrap();
    let read: Vec<Vec3> = view.iter().collect::<Result<_, _>>().unwrap();
    assert_eq!(read, positions);

    sprite.set_vertex_count(2);
    assert!(matches!(
        view.get(0),
        Err(SpriteDataError::StaleView { .. })
    ));

    let fresh = sprite.channel::<Vec3>(VertexChannel::Position).unwrap();
    assert_eq!(fresh.len(), 2);
}
