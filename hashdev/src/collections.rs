use alloc::vec::Vec;

/// 槽位表，空出的槽位会被之后的插入复用
#[derive(Debug, Clone)]
pub struct SlotVec<T>(Vec<Option<T>>);

impl<T> Default for SlotVec<T> {
    fn default() -> Self {
        Self(Vec::default())
    }
}

impl<T> SlotVec<T> {
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// 插入新元素至最靠前的空槽位，并返回槽位的索引
    pub fn insert(&mut self, element: T) -> usize {
        let index = self.0.iter().position(Option::is_none).unwrap_or_else(|| {
            self.0.push(None);
            self.0.len() - 1
        });
        self.0[index] = Some(element);
        index
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.0.get(index)?.as_ref()
    }

    /// 槽位越界或为空时返回空
    pub fn remove(&mut self, index: usize) -> Option<T> {
        self.0.get_mut(index)?.take()
    }

    /// 被占用的槽位数
    pub fn occupied(&self) -> usize {
        self.0.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.0.drain(..).flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuses_lowest_free_slot() {
        let mut slots = SlotVec::new();
        assert_eq!(slots.insert('a'), 0);
        assert_eq!(slots.insert('b'), 1);
        assert_eq!(slots.insert('c'), 2);

        assert_eq!(slots.remove(1), Some('b'));
        assert_eq!(slots.remove(1), None);
        assert_eq!(slots.insert('d'), 1);
        assert_eq!(slots.get(1), Some(&'d'));
        assert_eq!(slots.occupied(), 3);
    }

    #[test]
    fn out_of_range() {
        let mut slots: SlotVec<u8> = SlotVec::new();
        assert_eq!(slots.get(5), None);
        assert_eq!(slots.remove(5), None);
    }
}
