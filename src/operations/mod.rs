mod triangulate;

pub use triangulate::TriangulatePoints;
