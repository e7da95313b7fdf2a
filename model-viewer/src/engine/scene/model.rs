use bevy::gltf::Gltf;
use bevy::pbr::{Lightmap, NotShadowCaster, NotShadowReceiver};
use bevy::prelude::*;
use bevy::scene::SceneInstanceReady;

/// The model currently shown. Absent until the load sequence succeeds and
/// after teardown; every consumer treats absence as "nothing to do".
#[derive(Resource, Debug, Clone)]
pub struct LoadedModel {
    pub root: Entity,
    pub gltf: Handle<Gltf>,
    pub scene: Handle<Scene>,
    pub animation: Option<AnimationDriver>,
}

/// First animation clip of the model, wired through a single-node graph.
#[derive(Debug, Clone)]
pub struct AnimationDriver {
    pub graph: Handle<AnimationGraph>,
    pub node: AnimationNodeIndex,
}

/// Marker for the entity the glTF scene is spawned under.
#[derive(Component)]
pub struct ModelRoot;

#[derive(Debug, Clone, PartialEq)]
pub enum MaterialSlots {
    Single(Handle<StandardMaterial>),
    /// One material per primitive slot.
    MultiSlot(Vec<Handle<StandardMaterial>>),
}

impl MaterialSlots {
    pub fn handles(&self) -> &[Handle<StandardMaterial>] {
        match self {
            Self::Single(handle) => std::slice::from_ref(handle),
            Self::MultiSlot(handles) => handles,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeshNode {
    pub geometry: Handle<Mesh>,
    pub materials: MaterialSlots,
    pub lightmap: Option<Handle<Image>>,
}

/// Closed set of node kinds in a model hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Mesh(MeshNode),
    Group,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelNode {
    pub entity: Entity,
    pub kind: NodeKind,
}

pub type ModelNodeQuery<'w, 's> = Query<
    'w,
    's,
    (
        Option<&'static Mesh3d>,
        Option<&'static MeshMaterial3d<StandardMaterial>>,
        Option<&'static Lightmap>,
        Option<&'static Children>,
    ),
>;

pub fn classify_node(
    mesh: Option<&Mesh3d>,
    material: Option<&MeshMaterial3d<StandardMaterial>>,
    lightmap: Option<&Lightmap>,
    has_children: bool,
) -> NodeKind {
    match (mesh, has_children) {
        (Some(mesh), _) => NodeKind::Mesh(MeshNode {
            geometry: mesh.0.clone(),
            materials: material.map_or_else(
                || MaterialSlots::MultiSlot(Vec::new()),
                |material| MaterialSlots::Single(material.0.clone()),
            ),
            lightmap: lightmap.map(|lightmap| lightmap.image.clone()),
        }),
        (None, true) => NodeKind::Group,
        (None, false) => NodeKind::Other,
    }
}

/// Walks the hierarchy under `root` (inclusive), depth first.
pub fn collect_model_nodes(root: Entity, nodes: &ModelNodeQuery) -> Vec<ModelNode> {
    let mut hierarchy = Vec::new();
    let mut stack = vec![root];

    while let Some(entity) = stack.pop() {
        let Ok((mesh, material, lightmap, children)) = nodes.get(entity) else {
            continue;
        };
        if let Some(children) = children {
            stack.extend(children.iter());
        }
        hierarchy.push(ModelNode {
            entity,
            kind: classify_node(
                mesh,
                material,
                lightmap,
                children.is_some_and(|children| !children.is_empty()),
            ),
        });
    }

    hierarchy
}

/// Runs once the glTF scene is instantiated: every mesh casts and receives
/// shadows, and the first clip starts looping.
pub fn prepare_model_scene(
    trigger: Trigger<SceneInstanceReady>,
    mut commands: Commands,
    model: Option<Res<LoadedModel>>,
    nodes: ModelNodeQuery,
    mut players: Query<&mut AnimationPlayer>,
) {
    let hierarchy = collect_model_nodes(trigger.target(), &nodes);

    let mut meshes = 0;
    for node in &hierarchy {
        match &node.kind {
            NodeKind::Mesh(_) => {
                commands
                    .entity(node.entity)
                    .remove::<(NotShadowCaster, NotShadowReceiver)>();
                meshes += 1;
            }
            NodeKind::Group | NodeKind::Other => {}
        }
    }
    info!("Model scene ready: {} nodes, {} meshes", hierarchy.len(), meshes);

    let Some(driver) = model.as_ref().and_then(|model| model.animation.as_ref()) else {
        return;
    };
    let Some(player_entity) = hierarchy
        .iter()
        .map(|node| node.entity)
        .find(|entity| players.contains(*entity))
    else {
        warn!("Model has an animation clip but no animation player");
        return;
    };
    if let Ok(mut player) = players.get_mut(player_entity) {
        player.play(driver.node).repeat();
        commands
            .entity(player_entity)
            .insert(AnimationGraphHandle(driver.graph.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    #[test]
    fn hierarchy_nodes_are_classified() {
        let mut world = World::new();
        let mut mesh_entity = Entity::PLACEHOLDER;
        let mut bare_entity = Entity::PLACEHOLDER;
        let root = world
            .spawn(ModelRoot)
            .with_children(|parent| {
                mesh_entity = parent
                    .spawn((
                        Mesh3d(Handle::default()),
                        MeshMaterial3d::<StandardMaterial>(Handle::default()),
                    ))
                    .id();
                parent.spawn(Transform::default()).with_children(|group| {
                    bare_entity = group.spawn(Mesh3d(Handle::default())).id();
                });
            })
            .id();

        let nodes = world
            .run_system_once(move |nodes: ModelNodeQuery| collect_model_nodes(root, &nodes))
            .expect("query runs");
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[0].entity, root);
        assert_eq!(nodes[0].kind, NodeKind::Group);

        let kind_of = |entity: Entity| {
            nodes
                .iter()
                .find(|node| node.entity == entity)
                .map(|node| node.kind.clone())
                .expect("node collected")
        };
        let NodeKind::Mesh(textured) = kind_of(mesh_entity) else {
            panic!("mesh entity must classify as a mesh");
        };
        assert!(matches!(textured.materials, MaterialSlots::Single(_)));
        let NodeKind::Mesh(bare) = kind_of(bare_entity) else {
            panic!("bare mesh must classify as a mesh");
        };
        assert!(bare.materials.handles().is_empty());
    }

    #[test]
    fn leaf_without_mesh_is_other() {
        assert_eq!(classify_node(None, None, None, false), NodeKind::Other);
        assert_eq!(classify_node(None, None, None, true), NodeKind::Group);
    }
}
