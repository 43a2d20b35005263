//! Containers: clusters and assemblies
//!
//! A container exclusively owns its members, and ownership forms a tree: a
//! member has at most one owner and a container can never contain itself.
//! Adding a member establishes ownership only; links between members are
//! always created explicitly.
//!
//! - **Cluster**: ordered sequence of members
//! - **Assembly**: named fields, iterated in insertion order
//!
//! Removing a member destroys it (recursively for containers), pruning every
//! edge of every destroyed node.

use crate::graph::Graph;
use photon_core::{ContainerId, Error, Member, NodeId, Result};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Container variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// Ordered, homogeneous member sequence
    Cluster,
    /// Named, heterogeneous fields
    Assembly,
}

impl ContainerKind {
    fn name(self) -> &'static str {
        match self {
            ContainerKind::Cluster => "cluster",
            ContainerKind::Assembly => "assembly",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Members {
    Cluster(Vec<Member>),
    Assembly {
        fields: Vec<(String, Member)>,
        index: FxHashMap<String, usize>,
    },
}

impl Members {
    fn kind(&self) -> ContainerKind {
        match self {
            Members::Cluster(_) => ContainerKind::Cluster,
            Members::Assembly { .. } => ContainerKind::Assembly,
        }
    }

    fn len(&self) -> usize {
        match self {
            Members::Cluster(items) => items.len(),
            Members::Assembly { fields, .. } => fields.len(),
        }
    }

    fn iter(&self) -> MemberIter<'_> {
        match self {
            Members::Cluster(items) => MemberIter::Cluster(items.iter()),
            Members::Assembly { fields, .. } => MemberIter::Assembly(fields.iter()),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ContainerSlot {
    pub(crate) members: Members,
    pub(crate) owner: Option<ContainerId>,
}

/// Iterator over a container's members in insertion order.
///
/// Cluster members yield `None` as their name.
#[derive(Debug, Clone)]
pub enum MemberIter<'a> {
    /// Cluster members
    Cluster(std::slice::Iter<'a, Member>),
    /// Assembly fields
    Assembly(std::slice::Iter<'a, (String, Member)>),
}

impl<'a> Iterator for MemberIter<'a> {
    type Item = (Option<&'a str>, Member);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            MemberIter::Cluster(it) => it.next().map(|m| (None, *m)),
            MemberIter::Assembly(it) => it.next().map(|(name, m)| (Some(name.as_str()), *m)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            MemberIter::Cluster(it) => it.size_hint(),
            MemberIter::Assembly(it) => it.size_hint(),
        }
    }
}

impl ExactSizeIterator for MemberIter<'_> {}

impl Graph {
    // ========== Creation / lookup ==========

    fn create_container(&mut self, members: Members) -> ContainerId {
        let id = ContainerId::from_index(self.containers.len() as u32);
        self.containers.push(Some(ContainerSlot {
            members,
            owner: None,
        }));
        id
    }

    /// Create an empty cluster
    pub fn create_cluster(&mut self) -> ContainerId {
        self.create_container(Members::Cluster(Vec::new()))
    }

    /// Create an empty assembly
    pub fn create_assembly(&mut self) -> ContainerId {
        self.create_container(Members::Assembly {
            fields: Vec::new(),
            index: FxHashMap::default(),
        })
    }

    pub(crate) fn container_slot(&self, id: ContainerId) -> Result<&ContainerSlot> {
        self.containers
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(Error::ContainerNotFound(id))
    }

    fn container_slot_mut(&mut self, id: ContainerId) -> Result<&mut ContainerSlot> {
        self.containers
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(Error::ContainerNotFound(id))
    }

    /// Whether `id` refers to a live container
    pub fn contains_container(&self, id: ContainerId) -> bool {
        self.container_slot(id).is_ok()
    }

    /// Variant of a container
    pub fn container_kind(&self, id: ContainerId) -> Result<ContainerKind> {
        Ok(self.container_slot(id)?.members.kind())
    }

    /// Number of members
    pub fn container_len(&self, id: ContainerId) -> Result<usize> {
        Ok(self.container_slot(id)?.members.len())
    }

    /// Members in insertion order
    pub fn members(&self, id: ContainerId) -> Result<MemberIter<'_>> {
        Ok(self.container_slot(id)?.members.iter())
    }

    /// Owner of a member, if any
    pub fn owner_of(&self, member: Member) -> Result<Option<ContainerId>> {
        match member {
            Member::Node(id) => self.node_owner(id),
            Member::Container(id) => Ok(self.container_slot(id)?.owner),
        }
    }

    /// Cluster member at `index`
    pub fn member_at(&self, cluster: ContainerId, index: usize) -> Result<Member> {
        match &self.container_slot(cluster)?.members {
            Members::Cluster(items) => items.get(index).copied().ok_or(Error::IndexOutOfRange {
                index,
                len: items.len(),
            }),
            Members::Assembly { .. } => Err(Error::KindMismatch {
                container: cluster,
                expected: ContainerKind::Cluster.name(),
            }),
        }
    }

    /// Assembly field by name
    pub fn field(&self, assembly: ContainerId, name: &str) -> Result<Option<Member>> {
        match &self.container_slot(assembly)?.members {
            Members::Assembly { fields, index } => Ok(index.get(name).map(|i| fields[*i].1)),
            Members::Cluster(_) => Err(Error::KindMismatch {
                container: assembly,
                expected: ContainerKind::Assembly.name(),
            }),
        }
    }

    // ========== Ownership ==========

    /// Check that `member` can be adopted by `parent` without breaking the tree
    fn check_adoptable(&self, parent: ContainerId, member: Member) -> Result<()> {
        self.container_slot(parent)?;
        if let Some(owner) = self.owner_of(member)? {
            return Err(Error::AlreadyOwned { member, owner });
        }
        if let Member::Container(child) = member {
            // Walk up from parent; meeting child means child would own itself
            let mut cursor = Some(parent);
            while let Some(c) = cursor {
                if c == child {
                    return Err(Error::AlreadyOwned {
                        member,
                        owner: parent,
                    });
                }
                cursor = self.container_slot(c)?.owner;
            }
        }
        Ok(())
    }

    fn set_owner(&mut self, member: Member, owner: Option<ContainerId>) -> Result<()> {
        match member {
            Member::Node(id) => self.slot_mut(id)?.owner = owner,
            Member::Container(id) => self.container_slot_mut(id)?.owner = owner,
        }
        Ok(())
    }

    fn cluster_items_mut(&mut self, cluster: ContainerId) -> Result<&mut Vec<Member>> {
        match &mut self.container_slot_mut(cluster)?.members {
            Members::Cluster(items) => Ok(items),
            Members::Assembly { .. } => Err(Error::KindMismatch {
                container: cluster,
                expected: ContainerKind::Cluster.name(),
            }),
        }
    }

    /// Append a member to a cluster
    pub fn push(&mut self, cluster: ContainerId, member: impl Into<Member>) -> Result<()> {
        let member = member.into();
        let len = self.container_len(cluster)?;
        self.insert(cluster, len, member)
    }

    /// Insert a member into a cluster at `index`
    pub fn insert(
        &mut self,
        cluster: ContainerId,
        index: usize,
        member: impl Into<Member>,
    ) -> Result<()> {
        let member = member.into();
        self.check_adoptable(cluster, member)?;
        let items = self.cluster_items_mut(cluster)?;
        if index > items.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: items.len(),
            });
        }
        items.insert(index, member);
        self.set_owner(member, Some(cluster))
    }

    /// Add a named field to an assembly
    pub fn set_field(
        &mut self,
        assembly: ContainerId,
        name: impl Into<String>,
        member: impl Into<Member>,
    ) -> Result<()> {
        let name = name.into();
        let member = member.into();
        self.check_adoptable(assembly, member)?;
        match &mut self.container_slot_mut(assembly)?.members {
            Members::Assembly { fields, index } => {
                if index.contains_key(&name) {
                    return Err(Error::DuplicateField { field: name });
                }
                index.insert(name.clone(), fields.len());
                fields.push((name, member));
            }
            Members::Cluster(_) => {
                return Err(Error::KindMismatch {
                    container: assembly,
                    expected: ContainerKind::Assembly.name(),
                })
            }
        }
        self.set_owner(member, Some(assembly))
    }

    /// Remove and destroy the cluster member at `index`
    pub fn remove_at(&mut self, cluster: ContainerId, index: usize) -> Result<()> {
        let items = self.cluster_items_mut(cluster)?;
        if index >= items.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: items.len(),
            });
        }
        let member = items.remove(index);
        self.destroy_member(member)
    }

    /// Remove and destroy an assembly field; `false` if there was no such field
    pub fn remove_field(&mut self, assembly: ContainerId, name: &str) -> Result<bool> {
        let removed = match &mut self.container_slot_mut(assembly)?.members {
            Members::Assembly { fields, index } => match index.remove(name) {
                Some(pos) => {
                    let (_, member) = fields.remove(pos);
                    for slot in index.values_mut() {
                        if *slot > pos {
                            *slot -= 1;
                        }
                    }
                    Some(member)
                }
                None => None,
            },
            Members::Cluster(_) => {
                return Err(Error::KindMismatch {
                    container: assembly,
                    expected: ContainerKind::Assembly.name(),
                })
            }
        };
        match removed {
            Some(member) => {
                self.destroy_member(member)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Destroy an unowned container and everything it owns
    pub fn destroy_container(&mut self, id: ContainerId) -> Result<()> {
        if let Some(owner) = self.container_slot(id)?.owner {
            return Err(Error::AlreadyOwned {
                member: Member::Container(id),
                owner,
            });
        }
        self.destroy_member(Member::Container(id))
    }

    /// Destroy a member subtree. The caller has already detached it from its owner.
    fn destroy_member(&mut self, member: Member) -> Result<()> {
        let mut stack = vec![member];
        while let Some(next) = stack.pop() {
            match next {
                Member::Node(id) => {
                    self.destroy_node(id)?;
                }
                Member::Container(id) => {
                    let slot = self
                        .containers
                        .get_mut(id.index())
                        .and_then(Option::take)
                        .ok_or(Error::ContainerNotFound(id))?;
                    stack.extend(slot.members.iter().map(|(_, m)| m));
                    debug!(target: "photon::graph", container = %id, "container destroyed");
                }
            }
        }
        Ok(())
    }

    /// Nodes under a member, in pre-order
    pub fn nodes_within(&self, member: Member) -> Result<Vec<NodeId>> {
        let mut out = Vec::new();
        let mut stack = vec![member];
        while let Some(next) = stack.pop() {
            match next {
                Member::Node(id) => {
                    self.slot(id)?;
                    out.push(id);
                }
                Member::Container(id) => {
                    let members = self.members(id)?;
                    let children: Vec<Member> = members.map(|(_, m)| m).collect();
                    stack.extend(children.into_iter().rev());
                }
            }
        }
        Ok(out)
    }
}
