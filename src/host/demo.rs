//! Built-in demonstration document

/// Manual-entry value that asks for the demo document instead of a file
pub const DEMO_SENTINEL: &str = "demo";

pub fn is_demo(path: &str) -> bool {
    path.trim().eq_ignore_ascii_case(DEMO_SENTINEL)
}

const DEMO_BODY: &str = r#"# Demo Markdown Content

This is a demonstration of the Markdown Viewer.

## Features Working
- ✅ Markdown rendering with tables, footnotes and task lists
- ✅ Syntax highlighting for fenced code blocks
- ✅ Light and dark themes
- ✅ One window per file across running instances

## Sample Code Block

```javascript
function hello() {
    console.log("Markdown Viewer is working!");
    return "Hello World";
}
```

```rust
fn main() {
    println!("Hello from Rust");
}
```

## What You Can Test
1. **Keyboard Shortcuts**:
   - `Ctrl+O` to open a file
   - `F5` to reload
   - `Shift+?` to show shortcuts
2. **Themes**: start with `--theme dark`

| Key | Action |
|-----|--------|
| Ctrl+O | Open file |
| F5 | Reload |
"#;

/// The demo document; `requested` is the path the user asked for, if any
pub fn demo_document(requested: Option<&str>) -> String {
    match requested {
        Some(path) if !is_demo(path) => format!(
            "{}\nThe file path you entered was: **{}**\n",
            DEMO_BODY,
            path.replace('*', "\\*")
        ),
        _ => DEMO_BODY.to_string(),
    }
}
