/// Stable handle to one landform inside an [`ArenaTerrain`]. A handle is
/// invalidated when its landform is removed; reading through it afterwards
/// panics instead of dangling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

/// What a removal leaves behind: the removed height and the former
/// neighbors, which are adjacent to each other once the splice completes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Removed<H> {
    pub height: i64,
    pub prev: Option<H>,
    pub next: Option<H>,
}

pub trait Terrain {
    type Handle: Copy + PartialEq;

    fn head(&self) -> Option<Self::Handle>;
    fn height(&self, at: Self::Handle) -> i64;
    fn prev(&self, at: Self::Handle) -> Option<Self::Handle>;
    fn next(&self, at: Self::Handle) -> Option<Self::Handle>;
    fn len(&self) -> usize;

    fn push_back(&mut self, height: i64) -> Self::Handle;
    fn insert_before(&mut self, at: Self::Handle, height: i64) -> Self::Handle;
    fn remove(&mut self, at: Self::Handle) -> Removed<Self::Handle>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A landform is a valley when it sits strictly below both neighbors;
    /// at the edges only the existing neighbor counts, and a sole landform
    /// is always a valley.
    fn is_valley(&self, at: Self::Handle) -> bool {
        let height = self.height(at);
        match (self.prev(at), self.next(at)) {
            (None, None) => true,
            (None, Some(next)) => height < self.height(next),
            (Some(prev), None) => height < self.height(prev),
            (Some(prev), Some(next)) => height < self.height(prev) && height < self.height(next),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Node {
    height: i64,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

#[derive(Debug)]
enum Slot {
    Live(Node),
    Free { next_free: Option<usize> },
}

/// Doubly linked landscape backed by a slot arena. Links are indices rather
/// than owning pointers, so a cached handle can never dangle; removed slots
/// are recycled through a free list.
#[derive(Debug, Default)]
pub struct ArenaTerrain {
    slots: Vec<Slot>,
    free: Option<usize>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    len: usize,
}

impl ArenaTerrain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    fn node(&self, at: NodeId) -> &Node {
        match &self.slots[at.0] {
            Slot::Live(node) => node,
            Slot::Free { .. } => panic!("stale terrain handle"),
        }
    }

    fn node_mut(&mut self, at: NodeId) -> &mut Node {
        match &mut self.slots[at.0] {
            Slot::Live(node) => node,
            Slot::Free { .. } => panic!("stale terrain handle"),
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        match self.free {
            Some(slot) => {
                self.free = match self.slots[slot] {
                    Slot::Free { next_free } => next_free,
                    Slot::Live(_) => panic!("free list points at a live slot"),
                };
                self.slots[slot] = Slot::Live(node);
                NodeId(slot)
            }
            None => {
                self.slots.push(Slot::Live(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }
}

impl Terrain for ArenaTerrain {
    type Handle = NodeId;

    fn head(&self) -> Option<NodeId> {
        self.head
    }

    fn height(&self, at: NodeId) -> i64 {
        self.node(at).height
    }

    fn prev(&self, at: NodeId) -> Option<NodeId> {
        self.node(at).prev
    }

    fn next(&self, at: NodeId) -> Option<NodeId> {
        self.node(at).next
    }

    fn len(&self) -> usize {
        self.len
    }

    fn push_back(&mut self, height: i64) -> NodeId {
        let at = self.alloc(Node {
            height,
            prev: self.tail,
            next: None,
        });
        match self.tail {
            Some(tail) => self.node_mut(tail).next = Some(at),
            None => self.head = Some(at),
        }
        self.tail = Some(at);
        self.len += 1;
        at
    }

    fn insert_before(&mut self, at: NodeId, height: i64) -> NodeId {
        let prev = self.node(at).prev;
        let raised = self.alloc(Node {
            height,
            prev,
            next: Some(at),
        });
        match prev {
            Some(prev) => self.node_mut(prev).next = Some(raised),
            None => self.head = Some(raised),
        }
        self.node_mut(at).prev = Some(raised);
        self.len += 1;
        raised
    }

    fn remove(&mut self, at: NodeId) -> Removed<NodeId> {
        let Node { height, prev, next } = *self.node(at);
        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.tail = prev,
        }
        self.slots[at.0] = Slot::Free { next_free: self.free };
        self.free = Some(at.0);
        self.len -= 1;
        Removed { height, prev, next }
    }
}
