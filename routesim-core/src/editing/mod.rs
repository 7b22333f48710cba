mod route_editor;

pub use route_editor::RouteEditor;
