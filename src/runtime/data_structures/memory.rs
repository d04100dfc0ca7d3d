use std::{ fmt::{ self,
                  Display,
                  Formatter },
           rc::Rc };
use crate::{ lang::code::{ Body,
                           BodyPtr },
             runtime::{ data_structures::value::Value,
                        error::{ self,
                                 ErrorKind,
                                 ScriptError } } };



/// The most cells a single buffer may hold.  Stores and allocations past it are invalid addresses.
pub const MAX_CELLS: usize = 1 << 24;



/// Make room for a buffer of `length` cells, reporting sizes that are too large or can not be
/// allocated as invalid addresses.
fn reserve_cells(name: &str, cells: &mut Vec<Value>, length: usize) -> error::Result<()>
{
    if length > MAX_CELLS
    {
        return ScriptError::new_as_result(None,
                                          ErrorKind::InvalidAddress,
                                          format!("Buffer {} can not hold {} cells, the limit \
                                                   is {}.",
                                                  name,
                                                  length,
                                                  MAX_CELLS),
                                          None);
    }

    let additional = length.saturating_sub(cells.len());

    if let Err(error) = cells.try_reserve(additional)
    {
        return ScriptError::new_as_result(None,
                                          ErrorKind::InvalidAddress,
                                          format!("Could not grow buffer {} to {} cells: {}.",
                                                  name,
                                                  length,
                                                  error),
                                          None);
    }

    Ok(())
}



/// An address into a shared, growable buffer.  The buffer is the same structure used for word
/// bodies, so the append cursor HERE is simply a reference into the body of the word being
/// defined.
///
/// Cloning a MemoryRef gives a new cursor over the same buffer.  Moving one cursor never moves
/// another.
#[derive(Clone)]
pub struct MemoryRef
{
    buffer: BodyPtr,
    address: i64
}


/// Two references are equal if they point at the same cell of the same buffer.
impl PartialEq for MemoryRef
{
    fn eq(&self, other: &MemoryRef) -> bool
    {
        self.same_buffer(other) && self.address == other.address
    }
}


impl Display for MemoryRef
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        write!(f, "Ref at address {}", self.address)
    }
}


impl MemoryRef
{
    /// Create a reference to a cell in an existing buffer.
    pub fn new(buffer: BodyPtr, address: i64) -> MemoryRef
    {
        MemoryRef { buffer, address }
    }

    /// Allocate a fresh buffer of the given size, filled with none, and point at its first cell.
    pub fn allocate(name: &str, size: usize) -> error::Result<MemoryRef>
    {
        let mut cells = Vec::new();

        reserve_cells(name, &mut cells, size)?;
        cells.resize(size, Value::None);

        Ok(MemoryRef::new(Body::new_ptr(name, cells), 0))
    }

    /// The buffer this reference points into.
    pub fn buffer(&self) -> &BodyPtr
    {
        &self.buffer
    }

    /// The cell index within the buffer.
    pub fn address(&self) -> i64
    {
        self.address
    }

    /// Do both references share a buffer?
    pub fn same_buffer(&self, other: &MemoryRef) -> bool
    {
        Rc::ptr_eq(&self.buffer, &other.buffer)
    }

    /// A new reference into the same buffer at another address.
    pub fn with_address(&self, address: i64) -> MemoryRef
    {
        MemoryRef::new(self.buffer.clone(), address)
    }

    /// A new reference into the same buffer, moved by a relative amount.
    pub fn offset(&self, delta: i64) -> MemoryRef
    {
        self.with_address(self.address.wrapping_add(delta))
    }

    /// Read the cell at the address.  Reading outside of the buffer is an error, only stores grow
    /// the buffer.
    pub fn fetch(&self) -> error::Result<Value>
    {
        let buffer = self.buffer.borrow();

        match usize::try_from(self.address).ok().and_then(|index| buffer.cells.get(index))
        {
            Some(value) => Ok(value.clone()),
            None => ScriptError::new_as_result(None,
                                               ErrorKind::InvalidAddress,
                                               format!("Fetch from address {} of {}, which holds \
                                                        {} cells.",
                                                       self.address,
                                                       buffer.name,
                                                       buffer.cells.len()),
                                               None)
        }
    }

    /// Write the cell at the address.  If the address is past the end of the buffer the buffer is
    /// grown, with none filling the gap.
    pub fn store(&self, value: Value) -> error::Result<()>
    {
        let index = match usize::try_from(self.address)
            {
                Ok(index) => index,
                Err(_) =>
                    {
                        return ScriptError::new_as_result(None,
                                                          ErrorKind::InvalidAddress,
                                                          format!("Store to negative address {}.",
                                                                  self.address),
                                                          None);
                    }
            };

        let mut buffer = self.buffer.borrow_mut();

        if index >= buffer.cells.len()
        {
            let body = &mut *buffer;
            let length = index.saturating_add(1);

            reserve_cells(&body.name, &mut body.cells, length)?;
            body.cells.resize(length, Value::None);
        }

        buffer.cells[index] = value;

        Ok(())
    }

    /// The distance between two references into the same buffer.
    pub fn distance(&self, other: &MemoryRef) -> error::Result<i64>
    {
        self.check_same_buffer(other)?;
        Ok(self.address.wrapping_sub(other.address))
    }

    /// Combine the addresses of two references into the same buffer.
    pub fn combine(&self,
                   other: &MemoryRef,
                   operation: fn(i64, i64) -> i64) -> error::Result<MemoryRef>
    {
        self.check_same_buffer(other)?;
        Ok(self.with_address(operation(self.address, other.address)))
    }

    fn check_same_buffer(&self, other: &MemoryRef) -> error::Result<()>
    {
        if !self.same_buffer(other)
        {
            return ScriptError::new_as_result(None,
                                              ErrorKind::ForeignReference,
                                              format!("References into {} and {} can not be \
                                                       combined.",
                                                      self.buffer.borrow().name,
                                                      other.buffer.borrow().name),
                                              None);
        }

        Ok(())
    }
}



#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn stores_grow_the_buffer_without_disturbing_lower_cells()
    {
        let base = MemoryRef::allocate("<test>", 0).unwrap();

        for address in 0..5
        {
            base.with_address(address * 3).store(Value::Int(address)).unwrap();
        }

        assert_eq!(base.buffer().borrow().cells.len(), 13);

        for address in 0..5
        {
            assert!(base.with_address(address * 3).fetch().unwrap() == Value::Int(address));
        }

        assert!(base.with_address(1).fetch().unwrap().is_none());
    }

    #[test]
    fn fetch_past_the_end_is_an_invalid_address()
    {
        let base = MemoryRef::allocate("<test>", 2).unwrap();
        let error = base.with_address(2).fetch().unwrap_err();

        assert_eq!(*error.kind(), ErrorKind::InvalidAddress);
    }

    #[test]
    fn store_to_negative_address_fails()
    {
        let base = MemoryRef::allocate("<test>", 2).unwrap();

        assert!(base.with_address(-1).store(Value::Int(1)).is_err());
        assert_eq!(base.buffer().borrow().cells.len(), 2);
    }

    #[test]
    fn cloned_references_move_independently()
    {
        let first = MemoryRef::allocate("<test>", 4).unwrap();
        let second = first.offset(3);

        assert_eq!(first.address(), 0);
        assert_eq!(second.distance(&first).unwrap(), 3);

        second.store(Value::Int(9)).unwrap();
        assert!(first.with_address(3).fetch().unwrap() == Value::Int(9));
    }

    #[test]
    fn references_into_different_buffers_do_not_mix()
    {
        let first = MemoryRef::allocate("<a>", 1).unwrap();
        let second = MemoryRef::allocate("<b>", 1).unwrap();
        let error = first.distance(&second).unwrap_err();

        assert_eq!(*error.kind(), ErrorKind::ForeignReference);
        assert!(first.combine(&second, |a, b| a & b).is_err());
    }

    #[test]
    fn store_far_past_the_end_is_an_invalid_address()
    {
        let base = MemoryRef::allocate("<test>", 1).unwrap();

        for address in [ MAX_CELLS as i64, i64::MAX - 1, i64::MAX ]
        {
            let error = base.with_address(address).store(Value::Int(1)).unwrap_err();

            assert_eq!(*error.kind(), ErrorKind::InvalidAddress);
        }

        assert_eq!(base.buffer().borrow().cells.len(), 1);
    }

    #[test]
    fn oversized_allocation_is_an_invalid_address()
    {
        let error = MemoryRef::allocate("<test>", usize::MAX).err().unwrap();

        assert_eq!(*error.kind(), ErrorKind::InvalidAddress);
        assert!(MemoryRef::allocate("<test>", MAX_CELLS + 1).is_err());
    }
}
