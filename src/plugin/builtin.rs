// Descriptors shipped with the binary; `<root>/plugins/*.toml` may override them.
pub(super) const BUILTIN_PLUGINS: &[(&str, &str)] = &[
    ("builtin/deno.toml", include_str!("builtin/deno.toml")),
    ("builtin/go.toml", include_str!("builtin/go.toml")),
    ("builtin/node.toml", include_str!("builtin/node.toml")),
    ("builtin/zig.toml", include_str!("builtin/zig.toml")),
];
