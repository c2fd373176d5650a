//! Shader module creation with entry point and compilation checks.

use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("shader '{name}' is missing entry point '{entry_point}'")]
    MissingEntryPoint {
        name: &'static str,
        entry_point: &'static str,
    },

    #[error("shader '{name}' failed to compile: {message}")]
    CompilationFailed { name: &'static str, message: String },
}

/// Create a module from composed WGSL and fail if it does not compile.
///
/// `entry_points` are checked textually before the source reaches the
/// device. Creation runs inside a validation error scope, so invalid WGSL
/// comes back as [`ShaderError::CompilationFailed`] instead of reaching the
/// device's uncaptured error handler.
pub fn create_checked_module(
    device: &wgpu::Device,
    name: &'static str,
    source: &'static str,
    entry_points: &[&'static str],
) -> Result<wgpu::ShaderModule, ShaderError> {
    check_entry_points(name, source, entry_points)?;

    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(name),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    let validation = pollster::block_on(scope.pop());

    let info = pollster::block_on(module.get_compilation_info());
    let mut errors = Vec::new();
    for message in &info.messages {
        match message.message_type {
            wgpu::CompilationMessageType::Error => errors.push(message.message.clone()),
            wgpu::CompilationMessageType::Warning => {
                warn!(shader = name, "{}", message.message)
            }
            wgpu::CompilationMessageType::Info => {}
        }
    }
    if errors.is_empty()
        && let Some(error) = validation
    {
        errors.push(error.to_string());
    }
    if !errors.is_empty() {
        return Err(ShaderError::CompilationFailed {
            name,
            message: errors.join("; "),
        });
    }

    debug!(shader = name, bytes = source.len(), "Shader module created");
    Ok(module)
}

fn check_entry_points(
    name: &'static str,
    source: &str,
    entry_points: &[&'static str],
) -> Result<(), ShaderError> {
    for &entry_point in entry_points {
        let signature = format!("fn {entry_point}(");
        if !source.contains(&signature) {
            return Err(ShaderError::MissingEntryPoint { name, entry_point });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::create_test_device;
    use jovian_shading::fragments::{ATMOSPHERE_SHADER, SURFACE_SHADER};

    #[test]
    fn test_entry_points_found() {
        assert!(check_entry_points("surface", SURFACE_SHADER, &["vs_main", "fs_main"]).is_ok());
    }

    #[test]
    fn test_missing_entry_point() {
        let result = check_entry_points("atmosphere", ATMOSPHERE_SHADER, &["fs_glow"]);
        assert!(matches!(
            result,
            Err(ShaderError::MissingEntryPoint {
                entry_point: "fs_glow",
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_wgsl_is_a_typed_error() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        const BROKEN: &str = "@vertex fn vs_main() -> @builtin(position) vec4<f32> {\n\
                              return vec3<f32>(0.0);\n}\n\
                              @fragment fn fs_main() -> @location(0) vec4<f32> {\n\
                              return undefined_value;\n}\n";
        let result = create_checked_module(&device, "broken", BROKEN, &["vs_main", "fs_main"]);
        assert!(
            matches!(result, Err(ShaderError::CompilationFailed { name: "broken", .. })),
            "{:?}",
            result.map(|_| ())
        );
    }

    #[test]
    fn test_composed_shaders_compile() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        for (name, source) in [("surface", SURFACE_SHADER), ("atmosphere", ATMOSPHERE_SHADER)] {
            let result = create_checked_module(&device, name, source, &["vs_main", "fs_main"]);
            assert!(result.is_ok(), "{name}: {:?}", result.err());
        }
    }
}
