// Copyright 2025 stoa contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Stoa Sandbox
// Demonstration host: the headless providers plus one gameplay module,
// spun for a bounded number of frames.

use std::any::Any;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use glam::{Quat, Vec3, Vec4};
use log::{debug, info};

use stoa_backends::{AssetModule, AudioModule, PhysicsModule, RenderModule};
use stoa_core::contract::{
    AssetBackend, AudioBackend, BodyDesc, MaterialDesc, MeshDesc, PhysicsBackend, RenderBackend,
};
use stoa_core::{
    BoxedError, FrameContext, HostContext, Module, ModuleDescriptor, Version, API_VERSION,
};
use stoa_runtime::{Engine, EngineConfig};
use stoa_world::{
    AudioSourceRef, EntityId, Light, Name, Renderable, RigidBodyRef, Transform, World,
};

const DROP_HEIGHT: f32 = 10.0;
const DEFAULT_FRAMES: u64 = 240;

const BALL_POSITIONS: [Vec3; 3] = [
    Vec3::new(0.0, 0.5, 0.0),
    Vec3::new(-0.5, -0.5, 0.0),
    Vec3::new(0.5, -0.5, 0.0),
];
const BALL_INDICES: [u32; 3] = [0, 1, 2];

/// Gameplay module for the demo scene: a falling ball, a sun, an orbiting
/// point light, and a looping soundtrack.
#[derive(Default)]
struct DemoScene {
    elapsed: f32,
    beacon: Option<EntityId>,
}

impl DemoScene {
    fn descriptor() -> ModuleDescriptor {
        ModuleDescriptor::new("demo", Version::new(0, 1, 0), API_VERSION, "create_demo")
            .with_dependencies(["renderer", "physics", "assets", "audio"])
    }

    fn create() -> Box<dyn Module> {
        Box::<Self>::default()
    }
}

impl Module for DemoScene {
    fn name(&self) -> &str {
        "demo"
    }

    fn version(&self) -> Version {
        Version::new(0, 1, 0)
    }

    fn initialize(&mut self, host: &mut HostContext<'_>) -> Result<(), BoxedError> {
        let renderer = host.get::<dyn RenderBackend>()?;
        let physics = host.get::<dyn PhysicsBackend>()?;
        let assets = host.get::<dyn AssetBackend>()?;

        let mesh = renderer.create_mesh(&MeshDesc {
            label: Some("ball".to_string()),
            positions: BALL_POSITIONS.to_vec(),
            indices: BALL_INDICES.to_vec(),
        });
        let material = renderer.create_material(&MaterialDesc {
            label: Some("ball".to_string()),
            base_color: Vec4::new(0.9, 0.3, 0.2, 1.0),
            texture: None,
        });
        let body = physics.create_body(&BodyDesc {
            position: Vec3::new(0.0, DROP_HEIGHT, 0.0),
            ..BodyDesc::default()
        });

        if let Some(path) = host.config().get("asset").and_then(|value| value.as_str()) {
            let path = Path::new(path);
            if path.exists() {
                let id = assets.request_load(path);
                assets.watch(path);
                info!("Demo asset {id} requested from '{}'", path.display());
            } else {
                info!("Demo asset '{}' not found, skipping", path.display());
            }
        }

        let world = host
            .world_mut::<World>()
            .ok_or("the demo needs the engine world")?;

        let ball = world.spawn();
        world.insert(ball, Name::new("ball"));
        world.insert(
            ball,
            Transform::from_position(Vec3::new(0.0, DROP_HEIGHT, 0.0)),
        );
        world.insert(ball, Renderable::new(mesh, material));
        world.insert(ball, RigidBodyRef::dynamic(body));

        let sun = world.spawn();
        world.insert(sun, Name::new("sun"));
        world.insert(sun, Transform::IDENTITY);
        world.insert(sun, Light::directional());

        let beacon = world.spawn();
        world.insert(beacon, Name::new("beacon"));
        world.insert(beacon, Transform::from_position(Vec3::new(3.0, 2.0, 0.0)));
        world.insert(beacon, Light::point());
        self.beacon = Some(beacon);

        let jukebox = world.spawn();
        world.insert(jukebox, Name::new("jukebox"));
        let mut soundtrack = AudioSourceRef::new("demo-loop").looping();
        soundtrack.playing = true;
        world.insert(jukebox, soundtrack);

        info!("Demo scene assembled: {} entities", world.entity_count());
        Ok(())
    }

    fn shutdown(&mut self) {
        self.beacon = None;
    }

    fn update(&mut self, frame: &mut FrameContext<'_>, dt: Duration) -> Result<(), BoxedError> {
        self.elapsed += dt.as_secs_f32();
        let angle = self.elapsed;
        let Some(world) = frame.world_mut::<World>() else {
            return Ok(());
        };
        if let Some(transform) = self.beacon.and_then(|id| world.get_mut::<Transform>(id)) {
            transform.position = Quat::from_rotation_y(angle) * Vec3::new(3.0, 2.0, 0.0);
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn report(engine: &Engine) {
    let capabilities = engine.capabilities();

    if let Some(renderer) = capabilities.try_get::<dyn RenderBackend>() {
        let stats = renderer.last_frame_stats();
        let resources = renderer.resource_counts();
        info!(
            "Renderer '{}': frame {} closed with {} draws and {} lights ({} meshes, {} textures, {} materials alive)",
            renderer.backend_name(),
            stats.frame_index,
            stats.draw_calls,
            stats.lights,
            resources.meshes,
            resources.textures,
            resources.materials
        );
    }

    if let Some(physics) = capabilities.try_get::<dyn PhysicsBackend>() {
        info!(
            "Physics: {} bodies, gravity {:?}",
            physics.body_count(),
            physics.gravity()
        );
    }

    if let Some(assets) = capabilities.try_get::<dyn AssetBackend>() {
        info!("Assets: {} loads pending", assets.pending_count());
    }

    if let Some(audio) = capabilities.try_get::<dyn AudioBackend>() {
        info!("Audio: {} voices playing", audio.active_sounds());
    }

    for id in engine.world().entities_with::<RigidBodyRef>() {
        let name = engine.world().get::<Name>(id);
        let transform = engine.world().get::<Transform>(id);
        if let (Some(name), Some(transform)) = (name, transform) {
            info!("Body '{name}' ended at {:?}", transform.position);
        }
    }

    for event in engine.drain_events() {
        debug!("Engine event: {event:?}");
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "engine.json".to_string());
    let config = EngineConfig::load(&config_path)?;
    let frames = config.module_section("demo")["frames"]
        .as_u64()
        .unwrap_or(DEFAULT_FRAMES);

    let mut engine = Engine::new(config);
    engine.register_with(RenderModule::descriptor(), RenderModule::create)?;
    engine.register_with(PhysicsModule::descriptor(), PhysicsModule::create)?;
    engine.register_with(AssetModule::descriptor(), AssetModule::create)?;
    engine.register_with(AudioModule::descriptor(), AudioModule::create)?;
    engine.register_with(DemoScene::descriptor(), DemoScene::create)?;
    engine.install_standard_passes();

    engine.initialize()?;
    engine.run_frames(frames);
    report(&engine);
    engine.shutdown();
    Ok(())
}
