use glium::{program, Display, Program};
use glutin::surface::WindowSurface;

use crate::{error::GpuError, scene::ShaderKind};

pub struct Programs {
    default: Program,
    shiny: Program,
    textured: Program,
}

impl Programs {
    pub fn new(display: &Display<WindowSurface>) -> Result<Self, GpuError> {
        Ok(Self {
            default: default_program(display)?,
            shiny: shiny_program(display)?,
            textured: textured_program(display)?,
        })
    }

    pub fn get(&self, kind: ShaderKind) -> &Program {
        match kind {
            ShaderKind::Default => &self.default,
            ShaderKind::Shiny => &self.shiny,
            ShaderKind::Textured => &self.textured,
        }
    }
}

/// Lighting evaluated per vertex
fn default_program(display: &Display<WindowSurface>) -> Result<Program, GpuError> {
    Ok(program! (display,
        140 => { vertex: "
                    #version 140

                    uniform mat4 model;
                    uniform mat4 view;
                    uniform mat4 projection;
                    uniform vec4 lightpos;
                    uniform uint colourmode;
                    uniform uint emitmode;

                    in vec3 position;
                    in vec3 normal;
                    in vec4 colour;
                    in vec2 texture;

                    out vec4 v_colour;

                    const vec4 solid_colour = vec4(0.8, 0.6, 0.2, 1.0);

                    void main() {
                        vec4 base = colourmode == 1u ? solid_colour : colour;
                        mat4 model_view = view * model;
                        vec4 eye_position = model_view * vec4(position, 1.0);
                        vec3 n = normalize(mat3(model_view) * normal);
                        vec3 to_light = lightpos.xyz - eye_position.xyz;
                        float distance = length(to_light);
                        vec3 l = to_light / max(distance, 0.0001);

                        float attenuation = 1.0 / (1.0 + 0.2 * distance + 0.05 * distance * distance);
                        vec3 diffuse = max(dot(n, l), 0.0) * base.rgb;
                        vec3 reflected = reflect(-l, n);
                        vec3 specular = pow(max(dot(reflected, normalize(-eye_position.xyz)), 0.0), 8.0) * vec3(0.4);
                        vec3 ambient = base.rgb * 0.2;

                        v_colour = emitmode == 1u
                            ? vec4(1.0, 1.0, 0.8, 1.0)
                            : vec4(ambient + attenuation * (diffuse + specular), base.a);
                        gl_Position = projection * eye_position;
                    }
                ",

        fragment: "
                    #version 140

                    in vec4 v_colour;
                    out vec4 f_color;

                    void main() {
                        f_color = v_colour;
                    }
                ",
    })?)
}

/// Blinn-Phong evaluated per fragment
fn shiny_program(display: &Display<WindowSurface>) -> Result<Program, GpuError> {
    Ok(program! (display,
        140 => { vertex: "
                    #version 140

                    uniform mat4 model;
                    uniform mat4 view;
                    uniform mat4 projection;
                    uniform uint colourmode;

                    in vec3 position;
                    in vec3 normal;
                    in vec4 colour;
                    in vec2 texture;

                    out vec3 v_position;
                    out vec3 v_normal;
                    out vec4 v_colour;

                    const vec4 solid_colour = vec4(0.8, 0.6, 0.2, 1.0);

                    void main() {
                        mat4 model_view = view * model;
                        vec4 eye_position = model_view * vec4(position, 1.0);
                        v_position = eye_position.xyz;
                        v_normal = mat3(model_view) * normal;
                        v_colour = colourmode == 1u ? solid_colour : colour;
                        gl_Position = projection * eye_position;
                    }
                ",

        fragment: "
                    #version 140

                    in vec3 v_position;
                    in vec3 v_normal;
                    in vec4 v_colour;
                    out vec4 f_color;

                    uniform vec4 lightpos;
                    uniform uint emitmode;

                    const vec3 specular_colour = vec3(1.0, 1.0, 1.0);

                    void main() {
                        if (emitmode == 1u) {
                            f_color = vec4(1.0, 1.0, 0.8, 1.0);
                            return;
                        }
                        vec3 n = normalize(v_normal);
                        vec3 to_light = lightpos.xyz - v_position;
                        float distance = length(to_light);
                        vec3 l = to_light / max(distance, 0.0001);
                        vec3 half_direction = normalize(l + normalize(-v_position));

                        float attenuation = 1.0 / (1.0 + 0.2 * distance + 0.05 * distance * distance);
                        float lum = max(dot(n, l), 0.0);
                        float specular = pow(max(dot(half_direction, n), 0.0), 32.0);
                        vec3 ambient = v_colour.rgb * 0.2;

                        f_color = vec4(ambient + attenuation * (lum * v_colour.rgb + specular * specular_colour), v_colour.a);
                    }
                ",
    })?)
}

/// Material colours from the `.mtl` file, modulated by the diffuse and specular maps. A bump
/// map perturbs the normal in a tangent frame rebuilt from screen-space derivatives.
fn textured_program(display: &Display<WindowSurface>) -> Result<Program, GpuError> {
    Ok(program! (display,
        140 => { vertex: "
                    #version 140

                    uniform mat4 model;
                    uniform mat4 view;
                    uniform mat4 projection;

                    in vec3 position;
                    in vec3 normal;
                    in vec4 colour;
                    in vec2 texture;

                    out vec3 v_position;
                    out vec3 v_normal;
                    out vec2 v_tex_coords;

                    void main() {
                        mat4 model_view = view * model;
                        vec4 eye_position = model_view * vec4(position, 1.0);
                        v_position = eye_position.xyz;
                        v_normal = mat3(model_view) * normal;
                        v_tex_coords = texture;
                        gl_Position = projection * eye_position;
                    }
                ",

        fragment: "
                    #version 140

                    in vec3 v_position;
                    in vec3 v_normal;
                    in vec2 v_tex_coords;
                    out vec4 f_color;

                    uniform vec4 lightpos;
                    uniform vec3 ambient;
                    uniform vec3 diffuse;
                    uniform vec3 specular;
                    uniform vec3 emissive;
                    uniform float shininess;
                    uniform float opacity;
                    uniform sampler2D diffuse_tex;
                    uniform sampler2D specular_tex;
                    uniform sampler2D bump_tex;
                    uniform bool bumped;

                    mat3 cotangent_frame(vec3 n, vec3 p, vec2 uv) {
                        vec3 dp1 = dFdx(p);
                        vec3 dp2 = dFdy(p);
                        vec2 duv1 = dFdx(uv);
                        vec2 duv2 = dFdy(uv);

                        vec3 dp2perp = cross(dp2, n);
                        vec3 dp1perp = cross(n, dp1);
                        vec3 t = dp2perp * duv1.x + dp1perp * duv2.x;
                        vec3 b = dp2perp * duv1.y + dp1perp * duv2.y;
                        float scale = inversesqrt(max(max(dot(t, t), dot(b, b)), 1e-12));
                        return mat3(t * scale, b * scale, n);
                    }

                    void main() {
                        vec3 n = normalize(v_normal);
                        if (bumped) {
                            vec3 mapped = texture(bump_tex, v_tex_coords).rgb * 2.0 - 1.0;
                            n = normalize(cotangent_frame(n, v_position, v_tex_coords) * mapped);
                        }
                        vec3 l = normalize(lightpos.xyz - v_position);
                        vec3 half_direction = normalize(l + normalize(-v_position));

                        vec3 base = diffuse * texture(diffuse_tex, v_tex_coords).rgb;
                        vec3 shine = specular * texture(specular_tex, v_tex_coords).rgb;
                        float lum = max(dot(n, l), 0.0);
                        float highlight = pow(max(dot(half_direction, n), 0.0), max(shininess, 1.0));

                        f_color = vec4(emissive + ambient * base + lum * base + highlight * shine, opacity);
                    }
                ",
    })?)
}
