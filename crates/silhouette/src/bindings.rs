//! Maps the scene file onto the renderer's runtime configuration.

use glam::Vec3;
use renderer::{
    CameraSettings, ProgramSet, ProgramSources, RenderMode, RendererConfig, SceneSettings,
    StageSource, WindowSettings,
};
use sceneconfig::{ProgramFiles, SceneConfig};

pub fn renderer_config(config: &SceneConfig, mode: RenderMode) -> RendererConfig {
    let camera = &config.camera;
    RendererConfig {
        window: WindowSettings {
            size: (config.window.width, config.window.height),
            title: config.window.title.clone(),
            resizable: config.window.resizable,
            vsync: config.window.vsync,
        },
        programs: program_set(config),
        camera: CameraSettings {
            position: vec3(camera.position),
            yaw: camera.yaw as f32,
            pitch: camera.pitch as f32,
            speed: camera.speed as f32,
            sensitivity: camera.sensitivity as f32,
            zoom: camera.zoom as f32,
            near: camera.near as f32,
            far: camera.far as f32,
        },
        mouse_scale: camera.mouse_scale as f32,
        scene: scene_settings(config),
        mode,
    }
}

fn program_set(config: &SceneConfig) -> ProgramSet {
    let shaders = &config.shaders;
    ProgramSet {
        target: program_sources(&shaders.target),
        light: program_sources(&shaders.light),
        outline: program_sources(&shaders.outline),
    }
    .resolved_against(&shaders.dir)
}

fn program_sources(files: &ProgramFiles) -> ProgramSources {
    let sources = ProgramSources::from_paths(&files.vertex, &files.fragment);
    match &files.geometry {
        Some(geometry) => sources.with_geometry(StageSource::path(geometry)),
        None => sources,
    }
}

fn scene_settings(config: &SceneConfig) -> SceneSettings {
    let scene = &config.scene;
    SceneSettings {
        clear_color: scene.clear_color.map(|channel| channel as f32),
        object_color: vec3(scene.object_color),
        light_color: vec3(scene.light_color),
        light_position: vec3(scene.light_position),
        light_follows_camera: scene.light_follows_camera,
        outline_scale: scene.outline_scale as f32,
        show_light_cube: scene.show_light_cube,
    }
}

fn vec3(value: [f64; 3]) -> Vec3 {
    Vec3::from_array(value.map(|component| component as f32))
}
