//! Containment model: Directory -> File -> Tag.
//!
//! Directories live in an arena and refer to their children by index, so the
//! self-referential tree needs no shared ownership. The tree is assembled
//! leaf-first through [`TreeBuilder`]:
//! - a child must exist before its parent refers to it
//! - a child can be attached to one parent only
//! - a child's path must sit lexically under its parent's path
//!
//! Together these guarantee no cycles and no aliasing, so [`SourceTree::walk`]
//! visits every node exactly once.

use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, warn};

use crate::schema::{Tag, TagIdentity, TagPath};

/// Index of a file in a [`SourceTree`] or [`TreeBuilder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(usize);

/// Index of a directory in a [`SourceTree`] or [`TreeBuilder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DirectoryId(usize);

/// A source file and its documented tags in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct File {
    /// File name without the extension
    pub name: String,
    pub path: TagPath,
    pub tags: Vec<Tag>,
}

impl File {
    pub fn new(name: impl Into<String>, path: impl AsRef<std::path::Path>, tags: Vec<Tag>) -> Self {
        Self {
            name: name.into(),
            path: TagPath::new(path),
            tags,
        }
    }

    /// Name the file after its path's stem
    pub fn from_path(path: impl AsRef<std::path::Path>, tags: Vec<Tag>) -> Self {
        let path = TagPath::new(path);
        let name = path.file_stem().unwrap_or_default().to_string();
        Self { name, path, tags }
    }

    /// Tags whose path is not this file's path
    pub fn misplaced_tags(&self) -> Vec<&Tag> {
        self.tags.iter().filter(|t| t.path() != &self.path).collect()
    }
}

/// A directory; children are referenced by arena index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    pub name: String,
    pub path: TagPath,
    files: Vec<FileId>,
    directories: Vec<DirectoryId>,
}

impl Directory {
    pub fn files(&self) -> &[FileId] {
        &self.files
    }

    pub fn directories(&self) -> &[DirectoryId] {
        &self.directories
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("unknown file id {0:?}")]
    UnknownFile(FileId),

    #[error("unknown directory id {0:?}")]
    UnknownDirectory(DirectoryId),

    #[error("`{path}` is already attached to a directory")]
    AlreadyAttached { path: String },

    #[error("`{child}` is not under its parent directory `{parent}`")]
    NotNested { child: String, parent: String },

    #[error("`{path}` was built but never attached under the root")]
    Detached { path: String },
}

/// Leaf-first assembler for a [`SourceTree`]
#[derive(Debug, Default)]
pub struct TreeBuilder {
    files: Vec<File>,
    directories: Vec<Directory>,
    file_attached: Vec<bool>,
    directory_attached: Vec<bool>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, file: File) -> FileId {
        let misplaced = file.misplaced_tags();
        if !misplaced.is_empty() {
            warn!(
                "{} tag(s) in {} point at another path (first: {} in {})",
                misplaced.len(),
                file.path,
                misplaced[0].name(),
                misplaced[0].path()
            );
        }

        self.files.push(file);
        self.file_attached.push(false);
        FileId(self.files.len() - 1)
    }

    /// Add a directory over already-built children
    ///
    /// Fails without changing the builder if any child is unknown, already
    /// attached, listed twice, or outside `path`.
    pub fn add_directory(
        &mut self,
        name: impl Into<String>,
        path: impl AsRef<std::path::Path>,
        files: Vec<FileId>,
        directories: Vec<DirectoryId>,
    ) -> Result<DirectoryId, TreeError> {
        let path = TagPath::new(path);

        let mut seen_files = HashSet::new();
        for &id in &files {
            let file = self.files.get(id.0).ok_or(TreeError::UnknownFile(id))?;
            if self.file_attached[id.0] || !seen_files.insert(id) {
                return Err(TreeError::AlreadyAttached {
                    path: file.path.to_string(),
                });
            }
            check_nested(&file.path, &path)?;
        }

        let mut seen_dirs = HashSet::new();
        for &id in &directories {
            let dir = self
                .directories
                .get(id.0)
                .ok_or(TreeError::UnknownDirectory(id))?;
            if self.directory_attached[id.0] || !seen_dirs.insert(id) {
                return Err(TreeError::AlreadyAttached {
                    path: dir.path.to_string(),
                });
            }
            check_nested(&dir.path, &path)?;
        }

        for id in &files {
            self.file_attached[id.0] = true;
        }
        for id in &directories {
            self.directory_attached[id.0] = true;
        }

        self.directories.push(Directory {
            name: name.into(),
            path,
            files,
            directories,
        });
        self.directory_attached.push(false);
        Ok(DirectoryId(self.directories.len() - 1))
    }

    /// Close the tree over `root`
    ///
    /// Every other node must be attached somewhere below `root`.
    pub fn finish(self, root: DirectoryId) -> Result<SourceTree, TreeError> {
        let root_dir = self
            .directories
            .get(root.0)
            .ok_or(TreeError::UnknownDirectory(root))?;
        if self.directory_attached[root.0] {
            return Err(TreeError::AlreadyAttached {
                path: root_dir.path.to_string(),
            });
        }

        if let Some(idx) = self.file_attached.iter().position(|attached| !attached) {
            return Err(TreeError::Detached {
                path: self.files[idx].path.to_string(),
            });
        }
        if let Some(idx) = self
            .directory_attached
            .iter()
            .enumerate()
            .position(|(idx, attached)| !attached && idx != root.0)
        {
            return Err(TreeError::Detached {
                path: self.directories[idx].path.to_string(),
            });
        }

        debug!(
            "Built source tree at {}: {} directories, {} files",
            root_dir.path,
            self.directories.len(),
            self.files.len()
        );

        Ok(SourceTree {
            files: self.files,
            directories: self.directories,
            root,
        })
    }
}

fn check_nested(child: &TagPath, parent: &TagPath) -> Result<(), TreeError> {
    if child.is_within(parent) {
        Ok(())
    } else {
        Err(TreeError::NotNested {
            child: child.to_string(),
            parent: parent.to_string(),
        })
    }
}

/// A finished Directory -> File -> Tag tree
#[derive(Debug, Clone)]
pub struct SourceTree {
    files: Vec<File>,
    directories: Vec<Directory>,
    root: DirectoryId,
}

/// A node visited by [`SourceTree::walk`]
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Directory(&'a Directory),
    File(&'a File),
    Tag(&'a Tag),
}

impl SourceTree {
    pub fn root_id(&self) -> DirectoryId {
        self.root
    }

    pub fn root(&self) -> &Directory {
        &self.directories[self.root.0]
    }

    pub fn directory(&self, id: DirectoryId) -> Option<&Directory> {
        self.directories.get(id.0)
    }

    pub fn file(&self, id: FileId) -> Option<&File> {
        self.files.get(id.0)
    }

    /// Mutable access for the synthesis stage filling in documentation
    pub fn file_mut(&mut self, id: FileId) -> Option<&mut File> {
        self.files.get_mut(id.0)
    }

    pub fn files(&self) -> impl Iterator<Item = (FileId, &File)> {
        self.files.iter().enumerate().map(|(i, f)| (FileId(i), f))
    }

    /// Every tag in the tree, mutably
    pub fn tags_mut(&mut self) -> impl Iterator<Item = &mut Tag> {
        self.files.iter_mut().flat_map(|f| f.tags.iter_mut())
    }

    pub fn directory_count(&self) -> usize {
        self.directories.len()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn tag_count(&self) -> usize {
        self.files.iter().map(|f| f.tags.len()).sum()
    }

    /// Depth-first pre-order walk from the root
    ///
    /// A directory is followed by its files (each followed by its tags), then
    /// by its subdirectories, all in stored order.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            tree: self,
            stack: vec![Pending::Directory(self.root)],
        }
    }

    /// Borrowed nested view serializing as
    /// `{name, path, files: [...], directories: [...]}`
    pub fn nested(&self) -> NestedDirectory<'_> {
        NestedDirectory {
            tree: self,
            id: self.root,
        }
    }
}

enum Pending {
    Directory(DirectoryId),
    File(FileId),
    Tag(FileId, usize),
}

/// Iterator returned by [`SourceTree::walk`]
pub struct Walk<'a> {
    tree: &'a SourceTree,
    stack: Vec<Pending>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        match self.stack.pop()? {
            Pending::Directory(id) => {
                let dir = &tree.directories[id.0];
                // Reverse push so children pop in stored order
                for &sub in dir.directories.iter().rev() {
                    self.stack.push(Pending::Directory(sub));
                }
                for &file in dir.files.iter().rev() {
                    self.stack.push(Pending::File(file));
                }
                Some(Node::Directory(dir))
            }
            Pending::File(id) => {
                let file = &tree.files[id.0];
                for idx in (0..file.tags.len()).rev() {
                    self.stack.push(Pending::Tag(id, idx));
                }
                Some(Node::File(file))
            }
            Pending::Tag(id, idx) => Some(Node::Tag(&tree.files[id.0].tags[idx])),
        }
    }
}

/// Serializable nested view of one directory of a [`SourceTree`]
#[derive(Clone, Copy)]
pub struct NestedDirectory<'a> {
    tree: &'a SourceTree,
    id: DirectoryId,
}

impl Serialize for NestedDirectory<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let dir = &self.tree.directories[self.id.0];
        let files: Vec<&File> = dir.files.iter().map(|f| &self.tree.files[f.0]).collect();
        let directories: Vec<NestedDirectory<'_>> = dir
            .directories
            .iter()
            .map(|&id| NestedDirectory {
                tree: self.tree,
                id,
            })
            .collect();

        let mut state = serializer.serialize_struct("Directory", 4)?;
        state.serialize_field("name", &dir.name)?;
        state.serialize_field("path", &dir.path)?;
        state.serialize_field("files", &files)?;
        state.serialize_field("directories", &directories)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ClassRawTag, ClassTag, VariableRawTag, VariableTag};

    fn class_tag(name: &str, path: &str) -> Tag {
        let raw = ClassRawTag::new(name, path, &format!("^class {name}")).unwrap();
        ClassTag::from_raw(raw, "", Vec::new()).into()
    }

    fn variable_tag(name: &str, path: &str) -> Tag {
        let raw = VariableRawTag::new(name, path, &format!("^{name} =")).unwrap();
        VariableTag::from_raw(raw, "", "int").into()
    }

    #[test]
    fn test_file_from_path_uses_stem() {
        let file = File::from_path("src/widget.py", vec![]);
        assert_eq!(file.name, "widget");
        assert_eq!(file.path.to_unix_string(), "src/widget.py");
    }

    #[test]
    fn test_misplaced_tags_reported() {
        let file = File::from_path(
            "src/widget.py",
            vec![class_tag("Widget", "src/widget.py"), class_tag("Other", "src/other.py")],
        );
        let misplaced = file.misplaced_tags();
        assert_eq!(misplaced.len(), 1);
        assert_eq!(misplaced[0].name(), "Other");
    }

    #[test]
    fn test_child_must_exist_first() {
        let mut builder = TreeBuilder::new();
        let err = builder
            .add_directory("src", "src", vec![FileId(0)], vec![])
            .unwrap_err();
        assert_eq!(err, TreeError::UnknownFile(FileId(0)));
    }

    #[test]
    fn test_child_attached_once() {
        let mut builder = TreeBuilder::new();
        let file = builder.add_file(File::from_path("src/a.py", vec![]));
        builder.add_directory("src", "src", vec![file], vec![]).unwrap();
        let err = builder
            .add_directory("src2", "src", vec![file], vec![])
            .unwrap_err();
        assert!(matches!(err, TreeError::AlreadyAttached { .. }));
    }

    #[test]
    fn test_duplicate_child_in_one_call() {
        let mut builder = TreeBuilder::new();
        let file = builder.add_file(File::from_path("src/a.py", vec![]));
        let err = builder
            .add_directory("src", "src", vec![file, file], vec![])
            .unwrap_err();
        assert!(matches!(err, TreeError::AlreadyAttached { .. }));

        // The failed call left the file free to attach
        assert!(builder.add_directory("src", "src", vec![file], vec![]).is_ok());
    }

    #[test]
    fn test_child_must_be_nested() {
        let mut builder = TreeBuilder::new();
        let file = builder.add_file(File::from_path("lib/a.py", vec![]));
        let err = builder
            .add_directory("src", "src", vec![file], vec![])
            .unwrap_err();
        assert_eq!(
            err,
            TreeError::NotNested {
                child: "lib/a.py".to_string(),
                parent: "src".to_string()
            }
        );
    }

    #[test]
    fn test_parent_dirs_cannot_escape_the_directory() {
        let mut builder = TreeBuilder::new();
        let file = builder.add_file(File::from_path("src/../lib/a.py", vec![]));
        let err = builder
            .add_directory("src", "src", vec![file], vec![])
            .unwrap_err();
        assert_eq!(
            err,
            TreeError::NotNested {
                child: "src/../lib/a.py".to_string(),
                parent: "src".to_string()
            }
        );

        let outside = builder.add_file(File::from_path("../outside.py", vec![]));
        let err = builder
            .add_directory("root", ".", vec![outside], vec![])
            .unwrap_err();
        assert!(matches!(err, TreeError::NotNested { .. }));
    }

    #[test]
    fn test_finish_rejects_detached_nodes() {
        let mut builder = TreeBuilder::new();
        builder.add_file(File::from_path("src/lost.py", vec![]));
        let root = builder.add_directory("src", "src", vec![], vec![]).unwrap();
        let err = builder.finish(root).unwrap_err();
        assert_eq!(
            err,
            TreeError::Detached {
                path: "src/lost.py".to_string()
            }
        );
    }

    #[test]
    fn test_finish_rejects_attached_root() {
        let mut builder = TreeBuilder::new();
        let inner = builder.add_directory("ui", "src/ui", vec![], vec![]).unwrap();
        builder.add_directory("src", "src", vec![], vec![inner]).unwrap();
        assert!(matches!(
            builder.finish(inner).unwrap_err(),
            TreeError::AlreadyAttached { .. }
        ));
    }

    fn sample_tree() -> SourceTree {
        let mut builder = TreeBuilder::new();
        let widget = builder.add_file(File::from_path(
            "src/ui/widget.py",
            vec![
                class_tag("Widget", "src/ui/widget.py"),
                variable_tag("SIZE", "src/ui/widget.py"),
            ],
        ));
        let main = builder.add_file(File::from_path(
            "src/main.py",
            vec![variable_tag("DEBUG", "src/main.py")],
        ));
        let ui = builder
            .add_directory("ui", "src/ui", vec![widget], vec![])
            .unwrap();
        let root = builder
            .add_directory("src", "src", vec![main], vec![ui])
            .unwrap();
        builder.finish(root).unwrap()
    }

    #[test]
    fn test_walk_visits_each_node_once_in_order() {
        let tree = sample_tree();
        let visited: Vec<String> = tree
            .walk()
            .map(|node| match node {
                Node::Directory(d) => format!("d:{}", d.name),
                Node::File(f) => format!("f:{}", f.name),
                Node::Tag(t) => format!("t:{}", t.name()),
            })
            .collect();

        assert_eq!(
            visited,
            ["d:src", "f:main", "t:DEBUG", "d:ui", "f:widget", "t:Widget", "t:SIZE"]
        );
        assert_eq!(
            visited.len(),
            tree.directory_count() + tree.file_count() + tree.tag_count()
        );
    }

    #[test]
    fn test_tags_are_writable_after_assembly() {
        let mut tree = sample_tree();
        for tag in tree.tags_mut() {
            tag.set_description(format!("Docs for {}.", tag.name()));
        }
        let (_, widget) = tree.files().find(|(_, f)| f.name == "widget").unwrap();
        assert_eq!(widget.tags[0].description(), "Docs for Widget.");
    }

    #[test]
    fn test_nested_view_serializes_recursively() {
        let tree = sample_tree();
        let json = serde_json::to_value(tree.nested()).unwrap();
        assert_eq!(json["name"], "src");
        assert_eq!(json["files"][0]["name"], "main");
        assert_eq!(json["directories"][0]["path"], "src/ui");
        assert_eq!(json["directories"][0]["files"][0]["tags"][0]["kind"], "class");
    }
}
