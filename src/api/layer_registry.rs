use tracing::debug;

use crate::core::PixelPoint;
use crate::interaction::Gesture;
use crate::layers::{Layer, LayerId};

use super::PlotWindow;

impl PlotWindow {
    /// Appends `layer` on top of the z-order.
    pub fn add_layer<L: Layer>(&mut self, layer: L, refresh: bool) -> LayerId {
        self.add_boxed_layer(Box::new(layer), refresh)
    }

    pub fn add_boxed_layer(&mut self, layer: Box<dyn Layer>, refresh: bool) -> LayerId {
        let id = LayerId(self.next_layer_id);
        self.next_layer_id += 1;
        debug!(layer = %layer.name(), id = id.raw(), kind = ?layer.kind(), "layer added");
        self.layers.insert(id, layer);
        if refresh {
            self.update_all();
        }
        id
    }

    /// Detaches a layer and hands it back; dropping the box deletes it.
    pub fn remove_layer(&mut self, id: LayerId, refresh: bool) -> Option<Box<dyn Layer>> {
        let layer = self.layers.shift_remove(&id)?;
        let dragging_removed = matches!(
            self.interaction.gesture(),
            Gesture::DraggingInfo { layer: dragged, .. } if dragged == id
        );
        if dragging_removed {
            self.interaction.set_gesture(Gesture::Idle);
        }
        debug!(layer = %layer.name(), id = id.raw(), "layer removed");
        if refresh {
            self.update_all();
        }
        Some(layer)
    }

    /// Detaches every layer in z-order.
    pub fn remove_all_layers(&mut self, refresh: bool) -> Vec<Box<dyn Layer>> {
        let removed: Vec<Box<dyn Layer>> = self.layers.drain(..).map(|(_, layer)| layer).collect();
        self.interaction.set_gesture(Gesture::Idle);
        debug!(count = removed.len(), "all layers removed");
        if refresh {
            self.update_all();
        }
        removed
    }

    #[must_use]
    pub fn layer(&self, id: LayerId) -> Option<&dyn Layer> {
        Some(self.layers.get(&id)?.as_ref())
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut dyn Layer> {
        Some(self.layers.get_mut(&id)?.as_mut())
    }

    /// Layer at z-order position `index`.
    #[must_use]
    pub fn layer_at(&self, index: usize) -> Option<&dyn Layer> {
        Some(self.layers.get_index(index)?.1.as_ref())
    }

    pub fn layer_at_mut(&mut self, index: usize) -> Option<&mut dyn Layer> {
        Some(self.layers.get_index_mut(index)?.1.as_mut())
    }

    #[must_use]
    pub fn layer_id_at(&self, index: usize) -> Option<LayerId> {
        self.layers.get_index(index).map(|(id, _)| *id)
    }

    /// First layer named `name`.
    #[must_use]
    pub fn layer_by_name(&self, name: &str) -> Option<&dyn Layer> {
        let id = self.layer_id_by_name(name)?;
        self.layer(id)
    }

    pub fn layer_by_name_mut(&mut self, name: &str) -> Option<&mut dyn Layer> {
        let id = self.layer_id_by_name(name)?;
        self.layer_mut(id)
    }

    #[must_use]
    pub fn layer_id_by_name(&self, name: &str) -> Option<LayerId> {
        self.layers
            .iter()
            .find(|(_, layer)| layer.name() == name)
            .map(|(id, _)| *id)
    }

    /// Concrete view of a layer, e.g. `window.layer_as::<VectorLayer>(id)`.
    #[must_use]
    pub fn layer_as<T: Layer>(&self, id: LayerId) -> Option<&T> {
        self.layers.get(&id)?.as_any().downcast_ref::<T>()
    }

    pub fn layer_as_mut<T: Layer>(&mut self, id: LayerId) -> Option<&mut T> {
        self.layers.get_mut(&id)?.as_any_mut().downcast_mut::<T>()
    }

    pub fn layer_ids(&self) -> impl Iterator<Item = LayerId> + '_ {
        self.layers.keys().copied()
    }

    /// Number of layers that contribute a bounding box.
    #[must_use]
    pub fn count_layers(&self) -> usize {
        self.layers
            .values()
            .filter(|layer| layer.bounding_box().is_some())
            .count()
    }

    #[must_use]
    pub fn count_all_layers(&self) -> usize {
        self.layers.len()
    }

    /// Returns false when no such layer exists.
    pub fn set_layer_visible(&mut self, id: LayerId, visible: bool) -> bool {
        let Some(layer) = self.layers.get_mut(&id) else {
            return false;
        };
        layer.set_visible(visible);
        self.update_all();
        true
    }

    pub fn set_layer_visible_by_name(&mut self, name: &str, visible: bool) -> bool {
        match self.layer_id_by_name(name) {
            Some(id) => self.set_layer_visible(id, visible),
            None => false,
        }
    }

    pub fn set_layer_visible_at(&mut self, index: usize, visible: bool) -> bool {
        match self.layer_id_at(index) {
            Some(id) => self.set_layer_visible(id, visible),
            None => false,
        }
    }

    /// Unknown layers report false.
    #[must_use]
    pub fn is_layer_visible(&self, id: LayerId) -> bool {
        self.layer(id).is_some_and(|layer| layer.is_visible())
    }

    #[must_use]
    pub fn is_layer_visible_by_name(&self, name: &str) -> bool {
        self.layer_by_name(name).is_some_and(|layer| layer.is_visible())
    }

    #[must_use]
    pub fn is_layer_visible_at(&self, index: usize) -> bool {
        self.layer_at(index).is_some_and(|layer| layer.is_visible())
    }

    /// First visible info overlay containing `point`.
    #[must_use]
    pub fn info_layer_at(&self, point: PixelPoint) -> Option<LayerId> {
        self.layers
            .iter()
            .filter(|(_, layer)| layer.is_visible())
            .find(|(_, layer)| layer.as_info().is_some_and(|info| info.contains(point)))
            .map(|(id, _)| *id)
    }
}
