use crate::graph::{
    mix::Mix,
    modulate::Modulate,
    node::{GraphNode, Modulatable},
    through::Through,
};

pub trait NodeExt: GraphNode + Sized {
    fn through<F: GraphNode>(self, filter: F) -> Through<Self, F> {
        Through::new(self, filter)
    }

    fn modulate<M: GraphNode>(self, lfo: M, param: Self::Param, depth: f32) -> Modulate<Self, M>
    where
        Self: Modulatable,
    {
        Modulate::new(self, lfo, param, depth)
    }

    fn mix<M: GraphNode>(self, source: M, balance: f32) -> Mix<Self, M> {
        Mix::new(self, source, balance)
    }

    fn boxed(self) -> Box<dyn GraphNode>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<T: GraphNode> NodeExt for T {}
